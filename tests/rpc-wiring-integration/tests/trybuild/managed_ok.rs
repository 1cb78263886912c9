use infrastructure_common::ManagedObject;
use rpc_macros::ManagedObject;
use std::sync::Arc;

pub trait PayService: Send + Sync {
    fn pay(&self, amount: u64) -> String;
}

#[derive(ManagedObject)]
#[managed(implements(dyn PayService))]
#[service(interface = dyn PayService, version = "1.0", protocol = "dubbo", timeout = 3000, retries = 2)]
pub struct PayServiceImpl;

impl PayService for PayServiceImpl {
    fn pay(&self, amount: u64) -> String {
        amount.to_string()
    }
}

#[derive(ManagedObject)]
pub struct CheckoutController {
    #[reference(version = "1.0", registry = "zk, nacos", check = false, url = "dubbo://127.0.0.1:20880")]
    pay: Option<Arc<dyn PayService>>,
    #[reference(interface_name = "com.acme.Pay")]
    backup: Arc<dyn PayService>,
    label: String,
}

fn main() {
    let controller = CheckoutController {
        pay: None,
        backup: Arc::new(PayServiceImpl),
        label: String::new(),
    };
    assert_eq!(controller.reference_points().len(), 2);
    assert!(controller.service_marker().is_none());
    assert!(controller.pay.is_none());
    assert!(controller.label.is_empty());
    assert_eq!(controller.backup.pay(1), "1");
    assert_eq!(PayServiceImpl.type_info().contracts.len(), 1);
}
