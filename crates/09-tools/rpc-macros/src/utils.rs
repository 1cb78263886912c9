//! 宏工具函数

use syn::{GenericArgument, PathArguments, Type, TypePath};

fn last_segment_is(type_path: &TypePath, name: &str) -> bool {
    type_path
        .path
        .segments
        .last()
        .map(|segment| segment.ident == name)
        .unwrap_or(false)
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

/// 检查类型是否为 Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => last_segment_is(type_path, "Option"),
        _ => false,
    }
}

/// 去掉最外层的 Option，返回实际注入的类型
pub fn injected_type(ty: &Type) -> &Type {
    if is_option_type(ty) {
        extract_generic_type(ty).unwrap_or(ty)
    } else {
        ty
    }
}

/// 若类型形如 `Arc<dyn Contract>`，返回其中的 trait object 类型
pub fn arc_trait_object(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) if last_segment_is(type_path, "Arc") => {
            extract_generic_type(ty).filter(|inner| matches!(inner, Type::TraitObject(_)))
        }
        _ => None,
    }
}
