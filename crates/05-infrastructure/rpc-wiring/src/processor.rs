//! 注解装配处理器
//!
//! 容器在对象初始化前调用 [`AnnotationProcessor::before_initialization`] 注入远程服务引用，
//! 初始化后调用 [`AnnotationProcessor::after_initialization`] 导出声明的服务，
//! 关闭时调用 [`AnnotationProcessor::on_shutdown`] 取消所有导出并销毁所有引用。

use crate::config::{PackageFilter, WiringConfig};
use crate::export_registry::ExportRegistry;
use crate::identity::{resolve_reference, resolve_service, ResolvedReference, ResolvedService};
use crate::lookup::CollaboratorLookup;
use crate::reference_cache::ReferenceCache;
use async_trait::async_trait;
use infrastructure_common::{
    concrete_target, ManagedObject, ReferenceMarker, ReferencePoint, ServiceMarker, TypeInfo,
    WiringError, WiringResult, WiringState,
};
use parking_lot::Mutex;
use rpc_abstractions::{
    ApplicationConfig, ConsumerConfig, ExportFinalizer, ModuleConfig, MonitorConfig,
    NamingContext, ObjectPostProcessor, ProtocolConfig, ProviderConfig, ReferenceConfig,
    ReferenceFinalizer, ReferenceHandle, RegistryConfig, ServiceConfig, ShutdownReport,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 注解装配处理器
///
/// 每个容器持有一个实例，引用缓存与导出登记表归该实例所有。
pub struct AnnotationProcessor {
    naming: Arc<dyn NamingContext>,
    reference_finalizer: Arc<dyn ReferenceFinalizer>,
    export_finalizer: Arc<dyn ExportFinalizer>,
    filter: Option<PackageFilter>,
    state: Mutex<WiringState>,
    references: ReferenceCache,
    exports: ExportRegistry,
}

impl AnnotationProcessor {
    /// 创建构建器
    pub fn builder() -> AnnotationProcessorBuilder {
        AnnotationProcessorBuilder::new()
    }

    /// 当前生命周期状态
    pub fn state(&self) -> WiringState {
        *self.state.lock()
    }

    /// 引用缓存
    pub fn reference_cache(&self) -> &ReferenceCache {
        &self.references
    }

    /// 导出登记表
    pub fn export_registry(&self) -> &ExportRegistry {
        &self.exports
    }

    /// 包过滤器；未配置包时为 `None`
    pub fn package_filter(&self) -> Option<&PackageFilter> {
        self.filter.as_ref()
    }

    /// 判断钩子是否需要处理对象
    fn is_processing(&self, hook: &str, name: &str) -> bool {
        let state = self.state();
        if state == WiringState::ShuttingDown {
            warn!("装配处理器已关闭，忽略 {} 对象 '{}'", hook, name);
        }
        state.is_active()
    }

    fn accepts(&self, target: &TypeInfo) -> bool {
        self.filter
            .as_ref()
            .map_or(false, |filter| filter.matches(&target.name))
    }

    async fn wire_reference(
        &self,
        object: &mut dyn ManagedObject,
        owner: &TypeInfo,
        point: &ReferencePoint,
    ) -> WiringResult<()> {
        let resolved = resolve_reference(point, owner)?;
        let identity = resolved.identity.clone();

        let handle = self
            .references
            .resolve(&identity, || async move {
                let config = self.reference_config(&point.marker, resolved)?;
                debug!("终结远程服务引用: {}", config.identity);
                self.reference_finalizer
                    .finalize_reference(config)
                    .await
                    .map_err(WiringError::from)
            })
            .await?;

        // 终结期间发生了关闭：该句柄可能在清空缓存之后才插入
        if self.state() == WiringState::ShuttingDown {
            if let Some(orphan) = self.references.evict(&identity, &handle) {
                if let Err(e) = orphan.destroy().await {
                    error!("销毁关闭期间创建的引用失败: {}, 错误: {}", identity, e);
                }
            }
            return Err(WiringError::configuration(
                identity.to_string(),
                "装配处理器已关闭，放弃注入",
            ));
        }

        object.inject_reference(&point.member, handle.proxy())?;
        debug!("已注入引用 {} -> {}.{}", identity, owner.name, point.member);
        Ok(())
    }

    fn reference_config(
        &self,
        marker: &ReferenceMarker,
        resolved: ResolvedReference,
    ) -> WiringResult<ReferenceConfig> {
        let lookup = CollaboratorLookup::new(self.naming.as_ref());
        let mut config = ReferenceConfig::new(resolved.identity);
        config.contract = resolved.contract;
        config.registries = lookup.list_or_default::<RegistryConfig>(&marker.registry)?;
        config.consumer = lookup.single_or_default::<ConsumerConfig>(&marker.consumer)?;
        config.monitor = lookup.single_or_default::<MonitorConfig>(&marker.monitor)?;
        config.application = lookup.single_or_default::<ApplicationConfig>(&marker.application)?;
        config.module = lookup.single_or_default::<ModuleConfig>(&marker.module)?;
        if !marker.url.trim().is_empty() {
            config.url = Some(marker.url.trim().to_string());
        }
        config.timeout = marker.timeout;
        config.retries = marker.retries;
        config.check = marker.check;

        if config.application.is_none() {
            return Err(WiringError::configuration(
                config.identity.to_string(),
                "引用缺少应用配置，请声明 application 或注册默认应用",
            ));
        }
        Ok(config)
    }

    async fn export_service(
        &self,
        object: &Arc<dyn ManagedObject>,
        target: &TypeInfo,
        marker: &ServiceMarker,
    ) -> WiringResult<()> {
        let resolved = resolve_service(marker, target)?;
        let config = self.service_config(marker, target, resolved)?;
        let identity = config.identity.clone();

        debug!("导出远程服务: {} ({})", identity, target.name);
        let registration = self
            .export_finalizer
            .finalize_export(config, object.clone().into_any())
            .await?;

        let id = self.exports.add(identity.clone(), &target.name, registration);
        info!("已导出远程服务 {} ({}), 登记 {}", identity, target.name, id);
        Ok(())
    }

    fn service_config(
        &self,
        marker: &ServiceMarker,
        target: &TypeInfo,
        resolved: ResolvedService,
    ) -> WiringResult<ServiceConfig> {
        let lookup = CollaboratorLookup::new(self.naming.as_ref());
        let mut config = ServiceConfig::new(resolved.identity, &target.name);
        config.contract = resolved.contract;
        config.registries = lookup.list_or_default::<RegistryConfig>(&marker.registry)?;
        config.protocols = lookup.list_or_default::<ProtocolConfig>(&marker.protocol)?;
        config.provider = lookup.single_or_default::<ProviderConfig>(&marker.provider)?;
        config.monitor = lookup.single_or_default::<MonitorConfig>(&marker.monitor)?;
        config.application = lookup.single_or_default::<ApplicationConfig>(&marker.application)?;
        config.module = lookup.single_or_default::<ModuleConfig>(&marker.module)?;
        config.timeout = marker.timeout;
        config.retries = marker.retries;

        if config.application.is_none() {
            return Err(WiringError::configuration(
                &target.name,
                "导出服务缺少应用配置，请声明 application 或注册默认应用",
            ));
        }
        if config.protocols.is_empty() {
            debug!("{} 未声明协议，使用默认协议", target.name);
            config.protocols.push(Arc::new(ProtocolConfig::default()));
        }
        Ok(config)
    }
}

impl std::fmt::Debug for AnnotationProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationProcessor")
            .field("state", &self.state())
            .field("filter", &self.filter)
            .field("references", &self.references)
            .field("exports", &self.exports.len())
            .finish()
    }
}

#[async_trait]
impl ObjectPostProcessor for AnnotationProcessor {
    async fn before_initialization(
        &self,
        object: &mut dyn ManagedObject,
        name: &str,
    ) -> Result<(), WiringError> {
        if !self.is_processing("初始化前", name) {
            return Ok(());
        }

        let (owner, points) = {
            let target = concrete_target(&*object);
            (target.type_info(), target.reference_points())
        };
        if !self.accepts(&owner) || points.is_empty() {
            return Ok(());
        }

        debug!("处理对象 '{}' ({}) 的 {} 个引用", name, owner.name, points.len());
        for point in &points {
            self.wire_reference(object, &owner, point)
                .await
                .map_err(|e| {
                    WiringError::reference_initialization(&point.member, point.kind, &owner.name, e)
                })?;
        }
        Ok(())
    }

    async fn after_initialization(
        &self,
        object: Arc<dyn ManagedObject>,
        name: &str,
    ) -> Result<Arc<dyn ManagedObject>, WiringError> {
        if !self.is_processing("初始化后", name) {
            return Ok(object);
        }

        let (target, marker) = {
            let target = concrete_target(&*object);
            (target.type_info(), target.service_marker())
        };
        if !self.accepts(&target) {
            return Ok(object);
        }

        if let Some(marker) = marker {
            self.export_service(&object, &target, &marker)
                .await
                .map_err(|e| WiringError::service_export(&target.name, e))?;
        }
        Ok(object)
    }

    async fn on_shutdown(&self) -> ShutdownReport {
        let previous = std::mem::replace(&mut *self.state.lock(), WiringState::ShuttingDown);
        if previous == WiringState::ShuttingDown {
            debug!("装配处理器重复关闭");
        }

        let mut report = ShutdownReport::default();

        for entry in self.exports.drain() {
            match entry.registration.unexport().await {
                Ok(()) => {
                    debug!("已取消导出: {} ({})", entry.identity, entry.implementation);
                    report.unexported += 1;
                }
                Err(e) => {
                    error!("取消导出失败: {} ({}), 错误: {}", entry.identity, entry.implementation, e);
                    report.failures += 1;
                }
            }
        }

        for (key, handle) in self.references.drain() {
            match destroy(handle).await {
                Ok(()) => {
                    debug!("已销毁引用: {}", key);
                    report.destroyed += 1;
                }
                Err(e) => {
                    error!("销毁引用失败: {}, 错误: {}", key, e);
                    report.failures += 1;
                }
            }
        }

        info!(
            "装配处理器已关闭: 取消导出 {} 个, 销毁引用 {} 个, 失败 {} 个",
            report.unexported, report.destroyed, report.failures
        );
        report
    }
}

async fn destroy(handle: Arc<dyn ReferenceHandle>) -> WiringResult<()> {
    handle.destroy().await.map_err(WiringError::from)
}

/// 注解装配处理器构建器
#[derive(Default)]
pub struct AnnotationProcessorBuilder {
    naming: Option<Arc<dyn NamingContext>>,
    reference_finalizer: Option<Arc<dyn ReferenceFinalizer>>,
    export_finalizer: Option<Arc<dyn ExportFinalizer>>,
    package: Option<String>,
}

impl AnnotationProcessorBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用装配配置：设置包过滤并以协作对象目录作为命名上下文
    pub fn with_config(mut self, config: &WiringConfig) -> Self {
        self.package = config.package.clone();
        if self.naming.is_none() {
            self.naming = Some(Arc::new(config.collaborators.to_naming_context()));
        }
        self
    }

    pub fn with_naming_context(mut self, naming: Arc<dyn NamingContext>) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn with_reference_finalizer(mut self, finalizer: Arc<dyn ReferenceFinalizer>) -> Self {
        self.reference_finalizer = Some(finalizer);
        self
    }

    pub fn with_export_finalizer(mut self, finalizer: Arc<dyn ExportFinalizer>) -> Self {
        self.export_finalizer = Some(finalizer);
        self
    }

    /// 设置逗号分隔的扫描包；空字符串表示处理所有对象
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// 构建处理器
    pub fn build(self) -> WiringResult<AnnotationProcessor> {
        let naming = self
            .naming
            .ok_or_else(|| WiringError::configuration("AnnotationProcessor", "未设置命名上下文"))?;
        let reference_finalizer = self.reference_finalizer.ok_or_else(|| {
            WiringError::configuration("AnnotationProcessor", "未设置引用终结器")
        })?;
        let export_finalizer = self.export_finalizer.ok_or_else(|| {
            WiringError::configuration("AnnotationProcessor", "未设置导出终结器")
        })?;

        let filter = self.package.as_deref().map(PackageFilter::parse);
        let state = match &filter {
            Some(filter) => {
                info!("注解装配已启用, 扫描包: {:?}", filter.prefixes());
                WiringState::Active
            }
            None => {
                info!("未配置扫描包，注解装配不处理任何对象");
                WiringState::Unstarted
            }
        };

        Ok(AnnotationProcessor {
            naming,
            reference_finalizer,
            export_finalizer,
            filter,
            state: Mutex::new(state),
            references: ReferenceCache::new(),
            exports: ExportRegistry::new(),
        })
    }
}
