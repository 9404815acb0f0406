//! 标记检查器抽象接口

use lifecycle_common::{ActionSlot, MethodBody, TypeInfo, TypeShape};
use std::fmt;

/// 方法不可调度的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// 静态方法没有实例接收者
    StaticMethod,
    /// 方法声明了参数
    HasParameters,
    /// 方法有返回值
    ReturnsValue,
    /// 仅有能力契约上的签名声明，链上没有具体方法体
    NoConcreteBody,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::StaticMethod => "静态方法不能作为回收方法",
            Self::HasParameters => "回收方法不能声明参数",
            Self::ReturnsValue => "回收方法不能有返回值",
            Self::NoConcreteBody => "仅有契约签名声明，没有具体方法体",
        };
        f.write_str(message)
    }
}

/// 方法的可调度性判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// 可调度
    Eligible,
    /// 不可调度，附带原因；记录但不会中断其余方法的检查
    Ineligible(IneligibleReason),
}

impl Eligibility {
    /// 是否可调度
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// 候选方法
///
/// 标记检查器对链上每个动作槽位产出的一条判定记录。
/// 被更派生声明覆盖的祖先方法不会出现在结果中。
#[derive(Debug, Clone)]
pub struct CandidateMethod {
    /// 动作槽位
    pub slot: ActionSlot,
    /// 提供权威声明的类型
    pub declaring_type: TypeInfo,
    /// 权威声明是否携带回收标记
    pub has_marker: bool,
    /// 可调度性判定
    pub eligibility: Eligibility,
    /// 权威声明的方法体
    pub body: Option<MethodBody>,
}

impl CandidateMethod {
    /// 该候选是否应被调度为回收动作
    pub fn is_schedulable(&self) -> bool {
        self.has_marker && self.eligibility.is_eligible()
    }
}

/// 标记检查器 trait
///
/// 遍历类型的完整祖先链，对每个动作槽位给出权威声明及其判定。
pub trait MarkerInspector: Send + Sync {
    /// 检查类型形状
    ///
    /// 返回按调度顺序排列的候选方法：最派生类型在前，
    /// 同一类型内按声明顺序。
    fn inspect(&self, shape: &TypeShape) -> Vec<CandidateMethod>;
}
