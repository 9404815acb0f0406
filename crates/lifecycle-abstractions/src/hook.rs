//! 容器生命周期挂钩抽象接口

use async_trait::async_trait;
use lifecycle_common::{LifecycleResult, RetirementFailure, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 解析失败处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionFailurePolicy {
    /// 吞掉失败并记录警告日志，实例以空动作列表注册（默认）
    #[default]
    SwallowAndLog,
    /// 把解析失败向调用方传播
    Surface,
}

/// 容器生命周期挂钩 trait
///
/// 引擎与外部容器之间的集成点：实例创建时解析并注册回收动作，
/// 容器关闭时回收全部受管实例并聚合失败。
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    /// 实例创建通知
    ///
    /// 容器在构造出受管实例后立即调用。默认策略下解析失败
    /// 不会传播——行为不端的生命周期声明不能阻塞图构建。
    async fn on_instance_created(
        &self,
        instance: Arc<dyn Any + Send + Sync>,
        type_info: TypeInfo,
    ) -> LifecycleResult<()>;

    /// 容器关闭通知
    ///
    /// 容器在自身的作用域化关闭流程中恰好调用一次。
    /// 返回所有失败动作的聚合记录，关闭序列永不中途放弃。
    async fn on_container_close(&self) -> Vec<RetirementFailure>;
}
