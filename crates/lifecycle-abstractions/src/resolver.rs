//! 回收动作解析器抽象接口

use lifecycle_common::{InspectionResult, ShutdownAction, TypeShape};

/// 回收动作解析器 trait
///
/// 把标记检查结果与内建关闭协议合并为一份有序、去重的动作列表。
pub trait ShutdownActionResolver: Send + Sync {
    /// 解析类型形状的回收动作
    ///
    /// 顺序保证：最派生声明类型的动作在前，祖先类型的在后；
    /// 同一声明类型内按声明顺序。被覆盖的槽位只在覆盖处出现一次。
    /// 若链上存在内建关闭协议，关闭动作是唯一被调度的动作。
    fn resolve(&self, shape: &TypeShape) -> InspectionResult<Vec<ShutdownAction>>;
}
