//! 回收动作解析器实现

use crate::inspector::DefaultMarkerInspector;
use lifecycle_abstractions::{Eligibility, MarkerInspector, ShutdownActionResolver};
use lifecycle_common::{ActionKind, InspectionResult, ShutdownAction, TypeShape};
use std::sync::Arc;
use tracing::{debug, warn};

/// 内建关闭协议的动作名称
const CLOSE_ACTION: &str = "close";

/// 默认回收动作解析器
///
/// 消费标记检查结果，产出单份有序、去重的动作列表。
pub struct DefaultShutdownActionResolver {
    inspector: Arc<dyn MarkerInspector>,
}

impl DefaultShutdownActionResolver {
    /// 使用默认标记检查器创建解析器
    pub fn new() -> Self {
        Self::with_inspector(Arc::new(DefaultMarkerInspector::new()))
    }

    /// 使用指定标记检查器创建解析器
    pub fn with_inspector(inspector: Arc<dyn MarkerInspector>) -> Self {
        Self { inspector }
    }
}

impl Default for DefaultShutdownActionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownActionResolver for DefaultShutdownActionResolver {
    fn resolve(&self, shape: &TypeShape) -> InspectionResult<Vec<ShutdownAction>> {
        // 内建关闭协议优先：存在时关闭动作是该实例唯一被调度的动作，
        // 同类型上不相关的显式标记被抑制
        if let Some((declaring_type, body)) = shape.close_adapter() {
            debug!(
                "类型 {} 实现内建关闭协议，仅调度 close 动作",
                shape.type_info.name
            );
            return Ok(vec![ShutdownAction::new(
                CLOSE_ACTION,
                declaring_type.clone(),
                ActionKind::BuiltInResource,
                body.clone(),
            )]);
        }

        let mut actions = Vec::new();
        for candidate in self.inspector.inspect(shape) {
            if !candidate.is_schedulable() {
                if candidate.has_marker {
                    if let Eligibility::Ineligible(reason) = candidate.eligibility {
                        warn!(
                            "忽略无效的回收声明: {}::{}, {}",
                            candidate.declaring_type.name, candidate.slot.name, reason
                        );
                    }
                }
                continue;
            }

            if let Some(body) = candidate.body {
                actions.push(ShutdownAction::new(
                    candidate.slot.name,
                    candidate.declaring_type,
                    ActionKind::ExplicitMarker,
                    body,
                ));
            }
        }

        debug!(
            "类型 {} 解析出 {} 个回收动作",
            shape.type_info.name,
            actions.len()
        );
        Ok(actions)
    }
}
