//! 错误类型定义

use thiserror::Error;

/// 解析错误类型
///
/// 对应"无法为类型完成标记检查"一类的失败
#[derive(Error, Debug)]
pub enum InspectionError {
    #[error("类型形状未注册: {type_name}")]
    ShapeUnavailable { type_name: String },

    #[error("类型形状无效: {type_name}, 原因: {message}")]
    InvalidShape { type_name: String, message: String },
}

/// 回收执行错误类型
#[derive(Error, Debug)]
pub enum TeardownError {
    #[error("回收动作执行失败: {type_name}, 原因: {source}")]
    ActionFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("实例类型与动作目标不匹配: 期望 {expected}")]
    TargetTypeMismatch { expected: String },
}

/// 条件求值错误类型
#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("条件谓词求值失败: {predicate}, 原因: {message}")]
    EvaluationFailed { predicate: String, message: String },

    #[error("环境事实缺失: {fact}")]
    MissingFact { fact: String },
}

impl ConditionError {
    /// 创建求值失败错误
    pub fn evaluation_failed(predicate: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EvaluationFailed {
            predicate: predicate.into(),
            message: message.into(),
        }
    }
}

/// 生命周期引擎错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("生命周期解析错误: {source}")]
    Inspection {
        #[from]
        source: InspectionError,
    },

    #[error("回收执行错误: {source}")]
    Teardown {
        #[from]
        source: TeardownError,
    },

    #[error("条件求值错误: {source}")]
    Condition {
        #[from]
        source: ConditionError,
    },

    #[error("绑定构建失败: {binding}, 原因: {message}")]
    BindingConstructionFailed { binding: String, message: String },

    #[error("容器已关闭: {container_id}")]
    ContainerClosed { container_id: String },
}

/// 结果类型别名
pub type InspectionResult<T> = Result<T, InspectionError>;
pub type TeardownResult<T> = Result<T, TeardownError>;
pub type ConditionResult<T> = Result<T, ConditionError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
