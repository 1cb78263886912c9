//! 基于派生宏的端到端装配测试

use async_trait::async_trait;
use infrastructure_common::{
    FinalizeError, ManagedObject, ServiceProxy, WiringError, WiringState,
};
use rpc_abstractions::{
    ExportFinalizer, ExportRegistration, ObjectPostProcessor, ReferenceConfig, ReferenceFinalizer,
    ReferenceHandle, ServiceConfig,
};
use rpc_wiring::{AnnotationProcessor, WiringConfig};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("info")
            .try_init()
            .ok();
    });
}

const CONFIG: &str = r#"
package = "wiring_test::shop"

[collaborators.registries.zk]
address = "zookeeper://127.0.0.1:2181"

[collaborators.registries.nacos]
address = "nacos://127.0.0.1:8848"
default = false

[collaborators.applications.shop]
name = "shop"
owner = "checkout-team"

[collaborators.protocols.dubbo]
name = "dubbo"
port = 20880

[collaborators.protocols.rest]
name = "rest"
port = 8080
default = false
"#;

mod shop {
    use rpc_macros::ManagedObject;
    use std::sync::Arc;

    pub trait PayService: Send + Sync {
        fn pay(&self, amount: u64) -> String;
    }

    pub trait AuditService: Send + Sync {
        fn audit(&self, event: &str) -> String;
    }

    #[derive(ManagedObject, Default)]
    pub struct CheckoutController {
        #[reference(interface_name = "com.acme.Pay", version = "1.0", timeout = 2000)]
        pub pay: Option<Arc<dyn PayService>>,
        pub label: String,
    }

    #[derive(ManagedObject)]
    pub struct AuditController {
        #[reference(version = "2.0", registry = "nacos")]
        pub audit: Arc<dyn AuditService>,
    }

    pub struct LocalAudit;

    impl AuditService for LocalAudit {
        fn audit(&self, event: &str) -> String {
            format!("local:{}", event)
        }
    }

    #[derive(ManagedObject)]
    #[managed(implements(dyn PayService))]
    #[service(version = "1.0", protocol = "dubbo, rest", retries = 2)]
    pub struct PayServiceImpl {
        pub fee: u64,
    }

    impl PayService for PayServiceImpl {
        fn pay(&self, amount: u64) -> String {
            format!("paid:{}", amount + self.fee)
        }
    }

    #[derive(ManagedObject)]
    #[managed(implements(dyn PayService, dyn AuditService))]
    #[service]
    pub struct CombinedServiceImpl;

    #[derive(ManagedObject)]
    #[managed(implements(dyn PayService, dyn AuditService))]
    #[service(interface = dyn AuditService, version = "2.0")]
    pub struct ExplicitAuditServiceImpl;
}

use shop::{AuditService, PayService};

/// 远程代理替身
struct RemoteStub {
    serial: usize,
}

impl PayService for RemoteStub {
    fn pay(&self, amount: u64) -> String {
        format!("remote-{}:{}", self.serial, amount)
    }
}

impl AuditService for RemoteStub {
    fn audit(&self, event: &str) -> String {
        format!("remote-{}:{}", self.serial, event)
    }
}

struct StubHandle {
    proxy: ServiceProxy,
    destroyed: Arc<AtomicUsize>,
}

#[async_trait]
impl ReferenceHandle for StubHandle {
    fn proxy(&self) -> ServiceProxy {
        self.proxy.clone()
    }

    async fn destroy(&self) -> Result<(), FinalizeError> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 按接口名生成对应契约代理的引用终结器
#[derive(Default)]
struct StubReferenceFinalizer {
    calls: AtomicUsize,
    destroyed: Arc<AtomicUsize>,
    delay: Option<Duration>,
    configs: Mutex<Vec<ReferenceConfig>>,
}

#[async_trait]
impl ReferenceFinalizer for StubReferenceFinalizer {
    async fn finalize_reference(
        &self,
        config: ReferenceConfig,
    ) -> Result<Arc<dyn ReferenceHandle>, FinalizeError> {
        let serial = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let stub = Arc::new(RemoteStub { serial });
        let proxy: ServiceProxy = if config.identity.interface_name.ends_with("AuditService") {
            Arc::new(stub as Arc<dyn AuditService>)
        } else {
            Arc::new(stub as Arc<dyn PayService>)
        };
        self.configs.lock().unwrap().push(config);
        Ok(Arc::new(StubHandle {
            proxy,
            destroyed: self.destroyed.clone(),
        }))
    }
}

struct StubRegistration {
    unexported: Arc<AtomicUsize>,
}

#[async_trait]
impl ExportRegistration for StubRegistration {
    async fn unexport(&self) -> Result<(), FinalizeError> {
        self.unexported.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct StubExportFinalizer {
    unexported: Arc<AtomicUsize>,
    exported: Mutex<Vec<(ServiceConfig, Arc<dyn Any + Send + Sync>)>>,
}

#[async_trait]
impl ExportFinalizer for StubExportFinalizer {
    async fn finalize_export(
        &self,
        config: ServiceConfig,
        target: Arc<dyn Any + Send + Sync>,
    ) -> Result<Arc<dyn ExportRegistration>, FinalizeError> {
        self.exported.lock().unwrap().push((config, target));
        Ok(Arc::new(StubRegistration {
            unexported: self.unexported.clone(),
        }))
    }
}

fn processor(
    references: Arc<StubReferenceFinalizer>,
    exports: Arc<StubExportFinalizer>,
) -> anyhow::Result<AnnotationProcessor> {
    init_tracing();
    let config = WiringConfig::from_toml_str(CONFIG)?;
    Ok(AnnotationProcessor::builder()
        .with_config(&config)
        .with_reference_finalizer(references)
        .with_export_finalizer(exports)
        .build()?)
}

#[tokio::test]
async fn test_derived_reference_is_wired_from_configuration() -> anyhow::Result<()> {
    let references = Arc::new(StubReferenceFinalizer::default());
    let processor = processor(references.clone(), Arc::default())?;
    assert_eq!(processor.state(), WiringState::Active);

    let mut controller = shop::CheckoutController::default();
    processor
        .before_initialization(&mut controller, "checkoutController")
        .await?;

    let pay = controller.pay.as_ref().expect("pay 应当已注入");
    assert_eq!(pay.pay(10), "remote-1:10");

    let configs = references.configs.lock().unwrap();
    let config = &configs[0];
    assert_eq!(config.identity.canonical_key(), "/com.acme.Pay:1.0");
    assert_eq!(config.timeout, Some(2000));
    // nacos 声明为非默认，只使用 zk
    assert_eq!(config.registries.len(), 1);
    assert_eq!(config.registries[0].address, "zookeeper://127.0.0.1:2181");
    assert_eq!(
        config.application.as_ref().map(|app| app.name.as_str()),
        Some("shop")
    );
    Ok(())
}

#[tokio::test]
async fn test_plain_arc_field_is_replaced_by_remote_proxy() -> anyhow::Result<()> {
    let references = Arc::new(StubReferenceFinalizer::default());
    let processor = processor(references.clone(), Arc::default())?;

    let mut controller = shop::AuditController {
        audit: Arc::new(shop::LocalAudit),
    };
    assert_eq!(controller.audit.audit("login"), "local:login");

    processor
        .before_initialization(&mut controller, "auditController")
        .await?;

    assert_eq!(controller.audit.audit("login"), "remote-1:login");
    let configs = references.configs.lock().unwrap();
    assert_eq!(
        configs[0].identity.canonical_key(),
        "/wiring_test::shop::AuditService:2.0"
    );
    assert_eq!(configs[0].registries[0].address, "nacos://127.0.0.1:8848");
    Ok(())
}

#[tokio::test]
async fn test_derived_service_is_exported_and_torn_down() -> anyhow::Result<()> {
    let exports = Arc::new(StubExportFinalizer::default());
    let references = Arc::new(StubReferenceFinalizer::default());
    let processor = processor(references.clone(), exports.clone())?;

    let service: Arc<dyn ManagedObject> = Arc::new(shop::PayServiceImpl { fee: 1 });
    processor.after_initialization(service, "payService").await?;

    let mut controller = shop::CheckoutController::default();
    processor
        .before_initialization(&mut controller, "checkoutController")
        .await?;

    {
        let exported = exports.exported.lock().unwrap();
        let (config, target) = &exported[0];
        assert_eq!(
            config.identity.canonical_key(),
            "/wiring_test::shop::PayService:1.0"
        );
        let protocols: Vec<&str> = config.protocols.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(protocols, vec!["dubbo", "rest"]);
        assert_eq!(config.retries, Some(2));

        let implementation = target
            .clone()
            .downcast::<shop::PayServiceImpl>()
            .map_err(|_| anyhow::anyhow!("导出目标类型错误"))?;
        assert_eq!(implementation.pay(9), "paid:10");
    }

    let report = processor.on_shutdown().await;
    assert_eq!(report.unexported, 1);
    assert_eq!(report.destroyed, 1);
    assert_eq!(report.failures, 0);
    assert_eq!(exports.unexported.load(Ordering::SeqCst), 1);
    assert_eq!(references.destroyed.load(Ordering::SeqCst), 1);
    assert!(processor.export_registry().is_empty());
    assert!(processor.reference_cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_derived_service_with_two_contracts_needs_interface() -> anyhow::Result<()> {
    let exports = Arc::new(StubExportFinalizer::default());
    let processor = processor(Arc::default(), exports.clone())?;

    let err = match processor
        .after_initialization(Arc::new(shop::CombinedServiceImpl), "combined")
        .await
    {
        Ok(_) => anyhow::bail!("两个契约且未指定接口时应当失败"),
        Err(err) => err,
    };
    assert!(err.is_configuration());
    let message = err.to_string();
    assert!(message.contains("wiring_test::shop::CombinedServiceImpl"));
    assert!(message.contains("wiring_test::shop::PayService, wiring_test::shop::AuditService"));

    processor
        .after_initialization(Arc::new(shop::ExplicitAuditServiceImpl), "explicitAudit")
        .await?;
    let identities = processor.export_registry().identities();
    assert_eq!(identities.len(), 1);
    assert_eq!(
        identities[0].canonical_key(),
        "/wiring_test::shop::AuditService:2.0"
    );
    assert!(exports.exported.lock().unwrap().len() == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_initialization_shares_one_handle() -> anyhow::Result<()> {
    let references = Arc::new(StubReferenceFinalizer {
        delay: Some(Duration::from_millis(20)),
        ..StubReferenceFinalizer::default()
    });
    let processor = Arc::new(processor(references.clone(), Arc::default())?);

    let mut tasks = Vec::new();
    for index in 0..16 {
        let processor = processor.clone();
        tasks.push(tokio::spawn(async move {
            let name = format!("controller-{}", index);
            let mut controller = shop::CheckoutController {
                label: name.clone(),
                ..Default::default()
            };
            processor.before_initialization(&mut controller, &name).await?;
            Ok::<_, WiringError>(controller)
        }));
    }

    let mut answers = Vec::new();
    for task in tasks {
        let controller = task.await??;
        let pay = controller
            .pay
            .ok_or_else(|| anyhow::anyhow!("{} 未注入", controller.label))?;
        answers.push(pay.pay(1));
    }

    answers.dedup();
    assert_eq!(answers.len(), 1, "所有对象必须共享同一个引用句柄");

    let cache = processor.reference_cache();
    assert_eq!(cache.keys(), vec!["/com.acme.Pay:1.0".to_string()]);

    let stats = cache.stats();
    let calls = references.calls.load(Ordering::SeqCst) as u64;
    assert_eq!(stats.size, 1);
    assert_eq!(stats.hits + stats.misses, 16);
    assert_eq!(stats.misses, calls);
    assert_eq!(stats.discarded, calls - 1);
    // 竞争失败的候选句柄不会被销毁
    assert_eq!(references.destroyed.load(Ordering::SeqCst), 0);
    Ok(())
}
