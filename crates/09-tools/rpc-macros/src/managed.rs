//! `#[derive(ManagedObject)]` 实现

use crate::attributes::{find_attribute, implemented_contracts, marker_expr, MarkerKind};
use crate::utils::{arc_trait_object, injected_type, is_option_type};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result};

/// 单个引用注入点的生成片段
struct ReferenceField {
    point: TokenStream2,
    inject_arm: TokenStream2,
}

pub fn derive_managed_object_impl(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let contracts = implemented_contracts(&input.attrs)?;
    let service_marker = match find_attribute(&input.attrs, "service") {
        Some(attr) => {
            let marker = marker_expr(attr, MarkerKind::Service)?;
            quote! { Some(#marker) }
        }
        None => quote! { None },
    };

    let references = reference_fields(&input)?;
    let points = references.iter().map(|field| &field.point);
    let inject_arms = references.iter().map(|field| &field.inject_arm);

    Ok(quote! {
        impl #impl_generics infrastructure_common::ManagedObject for #name #ty_generics #where_clause {
            fn type_info(&self) -> infrastructure_common::TypeInfo {
                infrastructure_common::TypeInfo::of::<Self>()
                    #(.with_contract(infrastructure_common::ContractInfo::of::<#contracts>()))*
            }

            fn reference_points(&self) -> ::std::vec::Vec<infrastructure_common::ReferencePoint> {
                ::std::vec![#(#points),*]
            }

            fn service_marker(&self) -> ::std::option::Option<infrastructure_common::ServiceMarker> {
                #service_marker
            }

            #[allow(unused_variables)]
            fn inject_reference(
                &mut self,
                member: &str,
                proxy: infrastructure_common::ServiceProxy,
            ) -> ::std::result::Result<(), infrastructure_common::InjectionError> {
                match member {
                    #(#inject_arms)*
                    _ => ::std::result::Result::Err(infrastructure_common::InjectionError::UnknownMember {
                        member: member.to_string(),
                    }),
                }
            }

            fn into_any(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }
        }
    })
}

fn reference_fields(input: &DeriveInput) -> Result<Vec<ReferenceField>> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "ManagedObject 只能派生在结构体上",
            ))
        }
    };

    let named = match fields {
        Fields::Named(named) => &named.named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(_) => {
            let has_reference = fields
                .iter()
                .any(|field| find_attribute(&field.attrs, "reference").is_some());
            if has_reference {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[reference] 只能用于具名字段",
                ));
            }
            return Ok(Vec::new());
        }
    };

    let mut references = Vec::new();
    for field in named {
        let Some(attr) = find_attribute(&field.attrs, "reference") else {
            continue;
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let member = ident.to_string();
        let marker = marker_expr(attr, MarkerKind::Reference)?;

        let field_type = &field.ty;
        let injected = injected_type(field_type);
        let target_type = match arc_trait_object(injected) {
            Some(contract) => quote! {
                infrastructure_common::InjectionPointType::contract(
                    ::std::any::type_name::<#field_type>(),
                    infrastructure_common::ContractInfo::of::<#contract>(),
                )
            },
            None => quote! {
                infrastructure_common::InjectionPointType::concrete(
                    ::std::any::type_name::<#field_type>(),
                )
            },
        };

        let assign = if is_option_type(field_type) {
            quote! { self.#ident = ::std::option::Option::Some(value); }
        } else {
            quote! { self.#ident = value; }
        };

        references.push(ReferenceField {
            point: quote! {
                infrastructure_common::ReferencePoint::field(#member, #target_type, #marker)
            },
            inject_arm: quote! {
                #member => {
                    let value: #injected = proxy
                        .downcast::<#injected>()
                        .map(|value| (*value).clone())
                        .map_err(|_| infrastructure_common::InjectionError::TypeMismatch {
                            member: member.to_string(),
                            expected: ::std::any::type_name::<#injected>().to_string(),
                        })?;
                    #assign
                    ::std::result::Result::Ok(())
                }
            },
        });
    }

    Ok(references)
}
