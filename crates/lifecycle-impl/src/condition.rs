//! 条件求值器实现

use lifecycle_abstractions::{ConditionEvaluator, ConditionPredicate};
use lifecycle_common::Environment;
use tracing::{debug, warn};

/// 默认条件求值器
///
/// 在图构建期对绑定的谓词求值一次。谓词自身求值失败
/// 按未激活处理（fail-closed）并记录警告。
#[derive(Debug, Default)]
pub struct DefaultConditionEvaluator;

impl DefaultConditionEvaluator {
    /// 创建新的条件求值器
    pub fn new() -> Self {
        Self
    }
}

impl ConditionEvaluator for DefaultConditionEvaluator {
    fn is_active(&self, predicate: &dyn ConditionPredicate, environment: &Environment) -> bool {
        match predicate.evaluate(environment) {
            Ok(active) => {
                debug!(
                    "条件求值: {} => {}",
                    predicate.describe(),
                    if active { "激活" } else { "未激活" }
                );
                active
            }
            Err(error) => {
                warn!(
                    "条件求值失败，绑定按未激活处理: {}, 原因: {}",
                    predicate.describe(),
                    error
                );
                false
            }
        }
    }
}
