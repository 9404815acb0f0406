//! Centralized integration tests for conditional activation
//!
//! 覆盖：事实存在性驱动的激活判定、图构建期剪除、
//! 谓词求值失败的 fail-closed 行为以及测试框架探测谓词。

use lifecycle_abstractions::{ConditionEvaluator, ConditionPredicate, ResolutionFailurePolicy};
use lifecycle_common::{
    facts, ConditionError, ConditionResult, Environment, HasTeardownShape, MethodShape, TypeShape,
};
use lifecycle_composition::{ContainerBuilder, ManagedInstance};
use lifecycle_impl::{DefaultConditionEvaluator, OnCargoTest, OnFactPresent, OnNextest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 可观测回收行为的组件
#[derive(Debug, Default)]
struct Worker {
    shutdown_calls: AtomicUsize,
}

impl HasTeardownShape for Worker {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>().with_method(MethodShape::marked("shutdown").with_body::<Self, _>(
            |worker| {
                worker.shutdown_calls.fetch_add(1, Ordering::SeqCst);
            },
        ))
    }
}

/// 自身求值会失败的谓词
#[derive(Debug)]
struct BrokenPredicate;

impl ConditionPredicate for BrokenPredicate {
    fn describe(&self) -> &str {
        "无法求值的谓词"
    }

    fn evaluate(&self, _environment: &Environment) -> ConditionResult<bool> {
        Err(ConditionError::MissingFact {
            fact: "cluster.role".to_string(),
        })
    }
}

#[test]
fn test_is_binding_active_follows_fact_presence() {
    let evaluator = DefaultConditionEvaluator::new();
    let predicate = OnFactPresent::new("messaging.enabled");

    let enabled = Environment::new().with_flag("messaging.enabled");
    let disabled = Environment::new();

    assert!(evaluator.is_active(&predicate, &enabled));
    assert!(!evaluator.is_active(&predicate, &disabled));
}

#[tokio::test]
async fn test_inactive_binding_is_pruned_before_instantiation() {
    let provider_calls = Arc::new(AtomicUsize::new(0));
    let observed = provider_calls.clone();

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_guarded_provider(
            "messaging_worker",
            OnFactPresent::new("messaging.enabled"),
            move || {
                observed.fetch_add(1, Ordering::SeqCst);
                Ok(ManagedInstance::of(Worker::default()))
            },
        )
        .build()
        .await
        .unwrap();

    // 被剪除的绑定永远不会实例化
    assert_eq!(provider_calls.load(Ordering::SeqCst), 0);
    assert_eq!(container.managed_count(), 0);
    assert!(!container.has_binding("messaging_worker"));
    assert_eq!(container.pruned_bindings(), &["messaging_worker".to_string()]);

    assert!(container.close().await.is_clean());
}

#[tokio::test]
async fn test_active_binding_is_instantiated_and_retired() {
    let worker = Arc::new(Worker::default());
    let provided = worker.clone();

    let environment = Environment::new().with_flag("messaging.enabled");
    let container = ContainerBuilder::new()
        .with_environment(environment)
        .register_guarded_provider(
            "messaging_worker",
            OnFactPresent::new("messaging.enabled"),
            move || Ok(ManagedInstance::of_arc(provided)),
        )
        .build()
        .await
        .unwrap();

    assert!(container.has_binding("messaging_worker"));
    assert!(container.pruned_bindings().is_empty());
    assert_eq!(worker.shutdown_calls.load(Ordering::SeqCst), 0);

    container.close().await;
    assert_eq!(worker.shutdown_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_predicate_is_fail_closed() {
    let container = ContainerBuilder::new()
        .with_environment(Environment::new().with_flag("messaging.enabled"))
        .register_guarded_instance(
            "worker",
            BrokenPredicate,
            ManagedInstance::of(Worker::default()),
        )
        .build()
        .await
        .unwrap();

    // 无法求值的条件不能把绑定放进对象图
    assert_eq!(container.managed_count(), 0);
    assert_eq!(container.pruned_bindings(), &["worker".to_string()]);
}

#[tokio::test]
async fn test_mixed_guarded_and_unguarded_bindings() {
    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("always_on", ManagedInstance::of(Worker::default()))
        .register_guarded_instance(
            "feature_gated",
            OnFactPresent::new("feature.experimental"),
            ManagedInstance::of(Worker::default()),
        )
        .build()
        .await
        .unwrap();

    assert_eq!(container.managed_count(), 1);
    assert!(container.has_binding("always_on"));
    assert!(!container.has_binding("feature_gated"));

    let resolved = container.instance_of::<Worker>("always_on").unwrap();
    container.close().await;
    assert_eq!(resolved.shutdown_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_harness_detection_predicates() {
    let evaluator = DefaultConditionEvaluator::new();

    let cargo_only = Environment::new().with_flag(facts::CARGO_HARNESS);
    let nextest_only = Environment::new().with_flag(facts::NEXTEST_HARNESS);

    assert!(evaluator.is_active(&OnCargoTest, &cargo_only));
    assert!(!evaluator.is_active(&OnNextest, &cargo_only));
    assert!(evaluator.is_active(&OnNextest, &nextest_only));
    assert!(!evaluator.is_active(&OnCargoTest, &nextest_only));
}

/// 未在目录中登记形状的类型
#[derive(Debug, Default)]
struct UncatalogedComponent;

#[tokio::test]
async fn test_resolution_failure_is_swallowed_by_default() {
    // 默认策略下，缺失的形状按空动作列表登记，不阻塞图构建
    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("orphan", ManagedInstance::new(UncatalogedComponent))
        .build()
        .await
        .unwrap();

    assert_eq!(container.managed_count(), 1);
    assert!(container.close().await.is_clean());
}

#[tokio::test]
async fn test_resolution_failure_surfaces_under_strict_policy() {
    let result = ContainerBuilder::new()
        .with_environment(Environment::new())
        .with_resolution_policy(ResolutionFailurePolicy::Surface)
        .register_instance("orphan", ManagedInstance::new(UncatalogedComponent))
        .build()
        .await;

    assert!(result.is_err());
}
