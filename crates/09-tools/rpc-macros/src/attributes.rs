//! 声明属性解析
//!
//! 把 `#[reference(..)]` / `#[service(..)]` 中的键值对转换为标记构建器调用链，
//! 把 `#[managed(implements(..))]` 转换为契约列表。

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parenthesized, punctuated::Punctuated, Attribute, LitBool, LitInt, LitStr, Meta, Result,
    Token, Type,
};

/// 标记种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Reference,
    Service,
}

impl MarkerKind {
    fn attribute_name(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Service => "service",
        }
    }

    fn accepts_string(self, key: &str) -> bool {
        const SHARED: &[&str] = &[
            "interface_name",
            "group",
            "version",
            "registry",
            "monitor",
            "application",
            "module",
        ];
        SHARED.contains(&key)
            || match self {
                Self::Reference => matches!(key, "consumer" | "url"),
                Self::Service => matches!(key, "protocol" | "provider"),
            }
    }

    fn marker_type(self) -> TokenStream2 {
        match self {
            Self::Reference => quote! { infrastructure_common::ReferenceMarker },
            Self::Service => quote! { infrastructure_common::ServiceMarker },
        }
    }
}

/// 将标记属性解析为构建表达式，例如 `ReferenceMarker::new().with_version("1.0")`
pub fn marker_expr(attr: &Attribute, kind: MarkerKind) -> Result<TokenStream2> {
    let marker_type = kind.marker_type();
    let mut calls = Vec::new();

    // 不带参数的 #[reference] / #[service]
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(quote! { #marker_type::new() });
    }

    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();

        if key == "interface" {
            let contract: Type = meta.value()?.parse()?;
            calls.push(quote! {
                .with_interface(infrastructure_common::ContractInfo::of::<#contract>())
            });
        } else if kind.accepts_string(&key) {
            let value: LitStr = meta.value()?.parse()?;
            let method = format_ident!("with_{}", key);
            calls.push(quote! { .#method(#value) });
        } else if key == "timeout" {
            let value: LitInt = meta.value()?.parse()?;
            let timeout: u64 = value.base10_parse()?;
            calls.push(quote! { .with_timeout(#timeout) });
        } else if key == "retries" {
            let value: LitInt = meta.value()?.parse()?;
            let retries: u32 = value.base10_parse()?;
            calls.push(quote! { .with_retries(#retries) });
        } else if key == "check" && kind == MarkerKind::Reference {
            let value: LitBool = meta.value()?.parse()?;
            calls.push(quote! { .with_check(#value) });
        } else {
            return Err(meta.error(format!(
                "#[{}] 不支持属性 `{}`",
                kind.attribute_name(),
                key
            )));
        }
        Ok(())
    })?;

    Ok(quote! { #marker_type::new() #(#calls)* })
}

/// 解析 `#[managed(implements(dyn A, dyn B))]` 中声明的契约
pub fn implemented_contracts(attrs: &[Attribute]) -> Result<Vec<Type>> {
    let mut contracts = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("managed")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("implements") {
                let content;
                parenthesized!(content in meta.input);
                let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                contracts.extend(types);
                Ok(())
            } else {
                Err(meta.error("#[managed] 只支持 implements(..)"))
            }
        })?;
    }
    Ok(contracts)
}

/// 查找指定名称的属性
pub fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}
