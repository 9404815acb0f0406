//! 标记检查器实现

use lifecycle_abstractions::{CandidateMethod, Eligibility, IneligibleReason, MarkerInspector};
use lifecycle_common::{ActionSlot, MethodShape, TypeShape};
use std::collections::HashSet;

/// 默认标记检查器
///
/// 按线性化顺序（最派生在前）遍历祖先链，以 (名称, 参数个数)
/// 为槽位键，先到先得：更派生类型的声明占据槽位后，
/// 祖先的同槽位声明直接跳过——即使派生声明不携带任何标记，
/// 这也视为开发者有意抑制祖先的回收行为。
#[derive(Debug, Default)]
pub struct DefaultMarkerInspector;

impl DefaultMarkerInspector {
    /// 创建新的标记检查器
    pub fn new() -> Self {
        Self
    }

    fn classify(method: &MethodShape) -> Eligibility {
        if method.is_static {
            Eligibility::Ineligible(IneligibleReason::StaticMethod)
        } else if method.param_count > 0 {
            Eligibility::Ineligible(IneligibleReason::HasParameters)
        } else if !method.returns_unit {
            Eligibility::Ineligible(IneligibleReason::ReturnsValue)
        } else if method.body.is_none() {
            Eligibility::Ineligible(IneligibleReason::NoConcreteBody)
        } else {
            Eligibility::Eligible
        }
    }
}

impl MarkerInspector for DefaultMarkerInspector {
    fn inspect(&self, shape: &TypeShape) -> Vec<CandidateMethod> {
        let mut filled: HashSet<ActionSlot> = HashSet::new();
        let mut candidates = Vec::new();

        for node in shape.linearize() {
            for method in &node.methods {
                let slot = method.slot();
                if !filled.insert(slot.clone()) {
                    // 更派生类型已提供该槽位的权威声明
                    continue;
                }

                candidates.push(CandidateMethod {
                    slot,
                    declaring_type: node.type_info.clone(),
                    has_marker: method.has_teardown_marker,
                    eligibility: Self::classify(method),
                    body: method.body.clone(),
                });
            }
        }

        candidates
    }
}
