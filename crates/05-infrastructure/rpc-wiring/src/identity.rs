//! 能力标识解析
//!
//! 引用端优先级：显式接口名 > 显式接口类型 > 注入点静态类型（必须是契约）。
//! 导出端优先级：显式接口类型 > 显式接口名 > 唯一实现的契约。

use infrastructure_common::{
    CapabilityIdentity, ContractInfo, ReferencePoint, ServiceMarker, TypeInfo, WiringError,
};

/// 解析后的引用标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub identity: CapabilityIdentity,
    /// 契约类型（仅以类型确定接口时存在）
    pub contract: Option<ContractInfo>,
}

/// 解析后的导出标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    pub identity: CapabilityIdentity,
    pub contract: Option<ContractInfo>,
}

/// 解析注入点的能力标识
pub fn resolve_reference(
    point: &ReferencePoint,
    owner: &TypeInfo,
) -> Result<ResolvedReference, WiringError> {
    let marker = &point.marker;
    let (interface_name, contract) = if !marker.interface_name.is_empty() {
        (marker.interface_name.clone(), None)
    } else if let Some(contract) = &marker.interface {
        (contract.name.clone(), Some(contract.clone()))
    } else if let Some(contract) = &point.target_type.contract {
        (contract.name.clone(), Some(contract.clone()))
    } else {
        return Err(WiringError::configuration(
            format!("{}.{}", owner.name, point.member),
            format!(
                "引用声明未指定 interface 或 interface_name，且注入点类型 {} 不是接口",
                point.target_type.type_name
            ),
        ));
    };

    Ok(ResolvedReference {
        identity: CapabilityIdentity::new(&marker.group, interface_name, &marker.version),
        contract,
    })
}

/// 解析导出声明的能力标识
pub fn resolve_service(
    marker: &ServiceMarker,
    target: &TypeInfo,
) -> Result<ResolvedService, WiringError> {
    let (interface_name, contract) = if let Some(contract) = &marker.interface {
        (contract.name.clone(), Some(contract.clone()))
    } else if !marker.interface_name.is_empty() {
        (marker.interface_name.clone(), None)
    } else {
        match target.contracts.as_slice() {
            [single] => (single.name.clone(), Some(single.clone())),
            [] => {
                return Err(WiringError::configuration(
                    &target.name,
                    "导出声明未指定 interface 或 interface_name，且服务类型未实现任何接口",
                ))
            }
            many => {
                let names: Vec<&str> = many.iter().map(|c| c.name.as_str()).collect();
                return Err(WiringError::configuration(
                    &target.name,
                    format!(
                        "导出声明未指定 interface 或 interface_name，且服务类型实现了多个接口: {}",
                        names.join(", ")
                    ),
                ));
            }
        }
    };

    Ok(ResolvedService {
        identity: CapabilityIdentity::new(&marker.group, interface_name, &marker.version),
        contract,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{InjectionPointType, ReferenceMarker};

    fn owner() -> TypeInfo {
        TypeInfo::new("shop::checkout::CheckoutController")
    }

    fn contract_point(marker: ReferenceMarker) -> ReferencePoint {
        ReferencePoint::field(
            "pay",
            InjectionPointType::contract(
                "Arc<dyn shop::api::PayService>",
                ContractInfo::named("shop::api::PayService"),
            ),
            marker,
        )
    }

    #[test]
    fn test_explicit_name_wins_over_type_and_inferred() {
        let point = contract_point(
            ReferenceMarker::new()
                .with_interface_name("com.acme.Pay")
                .with_interface(ContractInfo::named("shop::api::LegacyPay"))
                .with_version("1.0"),
        );

        let resolved = resolve_reference(&point, &owner()).unwrap();
        assert_eq!(resolved.identity.canonical_key(), "/com.acme.Pay:1.0");
        assert!(resolved.contract.is_none());
    }

    #[test]
    fn test_explicit_type_wins_over_inferred() {
        let point = contract_point(
            ReferenceMarker::new()
                .with_interface(ContractInfo::named("shop::api::LegacyPay"))
                .with_group("cn"),
        );

        let resolved = resolve_reference(&point, &owner()).unwrap();
        assert_eq!(resolved.identity.canonical_key(), "cn/shop::api::LegacyPay:");
    }

    #[test]
    fn test_inferred_contract_type_is_used_last() {
        let resolved = resolve_reference(&contract_point(ReferenceMarker::new()), &owner()).unwrap();
        assert_eq!(resolved.identity.interface_name, "shop::api::PayService");
    }

    #[test]
    fn test_concrete_injection_type_is_a_configuration_error() {
        let point = ReferencePoint::field(
            "client",
            InjectionPointType::concrete("shop::api::PayClient"),
            ReferenceMarker::new(),
        );

        let err = resolve_reference(&point, &owner()).unwrap_err();
        assert!(err.is_configuration());
        let message = err.to_string();
        assert!(message.contains("CheckoutController.client"));
        assert!(message.contains("shop::api::PayClient"));
    }

    #[test]
    fn test_service_type_wins_over_name() {
        let marker = ServiceMarker::new()
            .with_interface(ContractInfo::named("shop::api::PayService"))
            .with_interface_name("com.acme.Pay");
        let target = TypeInfo::new("shop::impls::PayServiceImpl");

        let resolved = resolve_service(&marker, &target).unwrap();
        assert_eq!(resolved.identity.interface_name, "shop::api::PayService");
    }

    #[test]
    fn test_service_single_contract_is_inferred() {
        let target = TypeInfo::new("shop::impls::PayServiceImpl")
            .with_contract(ContractInfo::named("shop::api::PayService"));

        let resolved = resolve_service(&ServiceMarker::new().with_version("2.0"), &target).unwrap();
        assert_eq!(resolved.identity.canonical_key(), "/shop::api::PayService:2.0");
    }

    #[test]
    fn test_service_without_contracts_is_rejected() {
        let target = TypeInfo::new("shop::impls::Orphan");

        let err = resolve_service(&ServiceMarker::new(), &target).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("shop::impls::Orphan"));
    }

    #[test]
    fn test_service_with_two_contracts_is_ambiguous() {
        let target = TypeInfo::new("shop::impls::Both")
            .with_contract(ContractInfo::named("shop::api::A"))
            .with_contract(ContractInfo::named("shop::api::B"));

        let err = resolve_service(&ServiceMarker::new(), &target).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("shop::impls::Both"));
        assert!(message.contains("shop::api::A, shop::api::B"));
    }
}
