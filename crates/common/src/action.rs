//! 回收动作定义

use crate::errors::TeardownError;
use crate::metadata::TypeInfo;
use crate::shape::MethodBody;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// 动作种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// 显式回收标记产生的动作
    ExplicitMarker,
    /// 内建关闭协议产生的动作
    BuiltInResource,
}

/// 回收动作
///
/// 解析阶段为一个受管实例产生的可执行回收单元。
/// 每个动作在实例的生命周期内至多执行一次。
#[derive(Clone)]
pub struct ShutdownAction {
    name: String,
    declaring_type: TypeInfo,
    kind: ActionKind,
    body: MethodBody,
}

impl ShutdownAction {
    /// 创建新的回收动作
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeInfo,
        kind: ActionKind,
        body: MethodBody,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            kind,
            body,
        }
    }

    /// 获取动作名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取声明该动作的类型
    pub fn declaring_type(&self) -> &TypeInfo {
        &self.declaring_type
    }

    /// 获取动作种类
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// 在实例上执行动作
    pub fn invoke(&self, instance: &(dyn Any + Send + Sync)) -> Result<(), TeardownError> {
        self.body.invoke(instance)
    }
}

impl fmt::Debug for ShutdownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownAction")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type.name)
            .field("kind", &self.kind)
            .field("body", &"<function>")
            .finish()
    }
}

/// 回收失败记录
///
/// 容器关闭时聚合返回的 (实例类型, 动作, 失败) 三元组。
#[derive(Debug)]
pub struct RetirementFailure {
    /// 实例类型信息
    pub type_info: TypeInfo,
    /// 失败的动作名称
    pub action: String,
    /// 动作种类
    pub kind: ActionKind,
    /// 捕获的执行错误
    pub error: TeardownError,
}

impl fmt::Display for RetirementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{} 回收失败: {}",
            self.type_info.name, self.action, self.error
        )
    }
}
