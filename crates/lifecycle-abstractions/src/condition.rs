//! 条件谓词与求值器抽象接口

use lifecycle_common::{ConditionResult, Environment};

/// 条件谓词 trait
///
/// 附着在绑定上的声明式谓词：给定环境，回答激活或未激活。
/// 求值必须是纯函数且无副作用——同一谓词对同一环境
/// 在一个容器生命周期内总是产生相同结果。
pub trait ConditionPredicate: Send + Sync {
    /// 谓词的描述，用于日志与诊断
    fn describe(&self) -> &str;

    /// 对环境求值
    fn evaluate(&self, environment: &Environment) -> ConditionResult<bool>;
}

/// 条件求值器 trait
///
/// 在图构建期、实例创建之前对每个受保护绑定求值一次；
/// 未激活的绑定被整体移除，不做部分构建，也不再复查。
pub trait ConditionEvaluator: Send + Sync {
    /// 判定绑定是否激活
    ///
    /// 谓词自身求值失败按未激活处理（fail-closed）：
    /// 无法求值的条件不能悄悄把绑定放进对象图。
    fn is_active(&self, predicate: &dyn ConditionPredicate, environment: &Environment) -> bool;
}
