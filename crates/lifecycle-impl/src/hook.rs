//! 容器生命周期挂钩实现

use async_trait::async_trait;
use lifecycle_abstractions::{
    LifecycleHook, ResolutionFailurePolicy, ShapeCatalog, ShutdownActionResolver, ShutdownRegistry,
};
use lifecycle_common::{
    InspectionError, LifecycleResult, RetirementFailure, ShutdownAction, TypeInfo,
};
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

/// 默认容器生命周期挂钩
///
/// 实例创建时通过形状目录解析回收动作并登记到注册表；
/// 容器关闭时驱动注册表回收全部受管实例并聚合失败。
pub struct DefaultLifecycleHook {
    catalog: Arc<dyn ShapeCatalog>,
    resolver: Arc<dyn ShutdownActionResolver>,
    registry: Arc<dyn ShutdownRegistry>,
    policy: ResolutionFailurePolicy,
}

impl DefaultLifecycleHook {
    /// 创建新的生命周期挂钩
    pub fn new(
        catalog: Arc<dyn ShapeCatalog>,
        resolver: Arc<dyn ShutdownActionResolver>,
        registry: Arc<dyn ShutdownRegistry>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            registry,
            policy: ResolutionFailurePolicy::default(),
        }
    }

    /// 设置解析失败处理策略
    pub fn with_policy(mut self, policy: ResolutionFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 获取挂钩持有的注册表
    pub fn registry(&self) -> &Arc<dyn ShutdownRegistry> {
        &self.registry
    }

    fn resolve_actions(&self, type_info: &TypeInfo) -> Result<Vec<ShutdownAction>, InspectionError> {
        match self.catalog.shape_of(type_info.id) {
            Some(shape) => self.resolver.resolve(&shape),
            None => Err(InspectionError::ShapeUnavailable {
                type_name: type_info.module_path.clone(),
            }),
        }
    }
}

#[async_trait]
impl LifecycleHook for DefaultLifecycleHook {
    async fn on_instance_created(
        &self,
        instance: Arc<dyn Any + Send + Sync>,
        type_info: TypeInfo,
    ) -> LifecycleResult<()> {
        match self.resolve_actions(&type_info) {
            Ok(actions) => {
                self.registry.register(instance, type_info, actions).await;
                Ok(())
            }
            Err(error) => match self.policy {
                ResolutionFailurePolicy::SwallowAndLog => {
                    warn!(
                        "生命周期解析失败，按空动作列表登记: {}, 原因: {}",
                        type_info.name, error
                    );
                    self.registry.register(instance, type_info, Vec::new()).await;
                    Ok(())
                }
                ResolutionFailurePolicy::Surface => Err(error.into()),
            },
        }
    }

    async fn on_container_close(&self) -> Vec<RetirementFailure> {
        let failures = self.registry.retire_all().await;
        if failures.is_empty() {
            info!("全部受管实例回收完成");
        } else {
            warn!("回收完成，{} 个动作失败", failures.len());
        }
        failures
    }
}
