//! 回收注册表抽象接口

use async_trait::async_trait;
use lifecycle_common::{RetirementFailure, ShutdownAction, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 受管记录状态
///
/// 状态机 `Pending -> Retiring -> Retired`，Retired 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// 已注册，等待回收；唯一允许替换动作列表的状态
    Pending,
    /// 回收进行中
    Retiring,
    /// 已回收；重复回收请求静默忽略
    Retired,
}

/// 回收注册表 trait
///
/// 记录每个受管实例的动作列表，保证回收的幂等性：
/// 一个实例至多被回收一次，即使回收被请求多次。
/// 注册表的生命周期与单个容器绑定，不跨容器复用。
#[async_trait]
pub trait ShutdownRegistry: Send + Sync {
    /// 注册受管实例及其动作列表
    ///
    /// 同一实例（以 `Arc` 指针为身份）处于 Pending 状态时重复注册
    /// 会替换其动作列表；回收开始后的注册请求被忽略。
    async fn register(
        &self,
        instance: Arc<dyn Any + Send + Sync>,
        type_info: TypeInfo,
        actions: Vec<ShutdownAction>,
    );

    /// 回收单个实例
    ///
    /// 幂等：对已回收实例再次调用是空操作。返回该实例捕获的失败。
    async fn retire(&self, instance: &Arc<dyn Any + Send + Sync>) -> Vec<RetirementFailure>;

    /// 按注册顺序回收全部实例
    ///
    /// 每条记录在执行前转入 Retiring，完成后转入 Retired。
    /// 单个动作失败被捕获记录，不影响同实例的剩余动作，
    /// 也不影响其他实例的回收。
    async fn retire_all(&self) -> Vec<RetirementFailure>;

    /// 获取当前受管实例数量
    fn managed_count(&self) -> usize;

    /// 检查实例是否受管
    fn is_managed(&self, instance: &Arc<dyn Any + Send + Sync>) -> bool;
}
