//! 生命周期容器
//!
//! 持有受管实例，在关闭时驱动统一回收并产出聚合报告。

use lifecycle_abstractions::LifecycleHook;
use lifecycle_common::{Environment, RetirementFailure, TypeInfo};
use lifecycle_impl::DefaultLifecycleHook;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 活动绑定
pub(crate) struct ActiveBinding {
    pub(crate) name: String,
    pub(crate) type_info: TypeInfo,
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
}

/// 关闭报告
///
/// 容器关闭后返回给调用方的聚合结果。
#[derive(Debug)]
pub struct ShutdownReport {
    container_id: Uuid,
    failures: Vec<RetirementFailure>,
    closed_at: chrono::DateTime<chrono::Utc>,
}

impl ShutdownReport {
    fn new(container_id: Uuid, failures: Vec<RetirementFailure>) -> Self {
        Self {
            container_id,
            failures,
            closed_at: chrono::Utc::now(),
        }
    }

    /// 所属容器ID
    pub fn container_id(&self) -> Uuid {
        self.container_id
    }

    /// 失败的回收动作记录
    pub fn failures(&self) -> &[RetirementFailure] {
        &self.failures
    }

    /// 是否没有任何失败
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// 关闭时间
    pub fn closed_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.closed_at
    }
}

/// 生命周期容器
///
/// 由 [`crate::ContainerBuilder`] 构建。回收注册表随容器创建、
/// 随容器关闭废弃，不跨容器复用。
pub struct LifecycleContainer {
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    environment: Environment,
    hook: Arc<DefaultLifecycleHook>,
    bindings: Vec<ActiveBinding>,
    pruned: Vec<String>,
    closed: Mutex<bool>,
}

impl LifecycleContainer {
    pub(crate) fn assemble(
        environment: Environment,
        hook: Arc<DefaultLifecycleHook>,
        bindings: Vec<ActiveBinding>,
        pruned: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            environment,
            hook,
            bindings,
            pruned,
            closed: Mutex::new(false),
        }
    }

    /// 容器ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器创建时间
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// 容器使用的环境描述符
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// 活动绑定数量
    pub fn managed_count(&self) -> usize {
        self.bindings.len()
    }

    /// 检查指定名称的绑定是否活动
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.iter().any(|binding| binding.name == name)
    }

    /// 获取被条件剪除的绑定名称
    pub fn pruned_bindings(&self) -> &[String] {
        &self.pruned
    }

    /// 按名称获取受管实例句柄
    pub fn instance(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.bindings
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| binding.instance.clone())
    }

    /// 按名称获取指定类型的受管实例
    pub fn instance_of<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.instance(name)?.downcast::<T>().ok()
    }

    /// 按名称获取绑定的类型信息
    pub fn binding_type(&self, name: &str) -> Option<&TypeInfo> {
        self.bindings
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| &binding.type_info)
    }

    /// 容器是否已关闭
    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }

    /// 关闭容器
    ///
    /// 按构造顺序回收全部受管实例并聚合失败。
    /// 幂等：重复关闭返回空报告，不执行任何动作。
    pub async fn close(&self) -> ShutdownReport {
        {
            let mut closed = self.closed.lock();
            if *closed {
                debug!("容器 {} 已关闭，忽略重复请求", self.id);
                return ShutdownReport::new(self.id, Vec::new());
            }
            *closed = true;
        }

        info!("关闭容器: {}", self.id);
        let failures = self.hook.on_container_close().await;
        ShutdownReport::new(self.id, failures)
    }
}

impl Drop for LifecycleContainer {
    fn drop(&mut self) {
        if !*self.closed.lock() && !self.bindings.is_empty() {
            warn!(
                "容器 {} 未显式关闭便被丢弃，{} 个受管实例的回收动作不会执行",
                self.id,
                self.bindings.len()
            );
        }
    }
}
