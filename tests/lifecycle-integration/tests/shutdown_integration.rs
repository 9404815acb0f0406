//! Centralized integration tests for the shutdown engine
//!
//! 场景复刻自引擎的参考行为：显式标记、继承覆盖、契约声明、
//! 无效声明以及内建关闭协议的优先级。

use lifecycle_common::{
    CloseableResource, Environment, HasTeardownShape, MethodShape, TypeShape,
};
use lifecycle_composition::{ContainerBuilder, ManagedInstance};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 携带单个标记回收方法的组件
#[derive(Debug, Default)]
struct Foo {
    shutdown_calls: AtomicUsize,
}

impl Foo {
    fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl HasTeardownShape for Foo {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>()
            .with_method(MethodShape::marked("shutdown").with_body::<Self, _>(Self::shutdown))
    }
}

#[tokio::test]
async fn test_lifecycle_shutdown() {
    let foo = Arc::new(Foo::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("foo", ManagedInstance::of_arc(foo.clone()))
        .build()
        .await
        .unwrap();

    // 关闭前不得有任何调用
    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 0);

    let report = container.close().await;
    assert!(report.is_clean());
    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 1);

    // 重复关闭是空操作
    let report = container.close().await;
    assert!(report.is_clean());
    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lifecycle_shutdown_with_provider() {
    // 通过提供者方法绑定的实例，回收行为与直接构造完全一致
    let foo = Arc::new(Foo::default());
    let provided = foo.clone();

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_provider("foo", move || Ok(ManagedInstance::of_arc(provided)))
        .build()
        .await
        .unwrap();

    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 0);

    let report = container.close().await;
    assert!(report.is_clean());
    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 1);
}

/// 三种无效的回收声明：有返回值、静态方法、带参数
#[derive(Debug, Default)]
struct InvalidTeardowns {
    return_value_calls: AtomicUsize,
    static_calls: AtomicUsize,
    parameter_calls: AtomicUsize,
}

impl HasTeardownShape for InvalidTeardowns {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>()
            .with_method(
                MethodShape::marked("shutdown_with_return_value")
                    .with_return_value()
                    .with_body::<Self, _>(|this| {
                        this.return_value_calls.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .with_method(
                MethodShape::marked("shutdown_static")
                    .static_method()
                    .with_body::<Self, _>(|this| {
                        this.static_calls.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .with_method(
                MethodShape::marked("shutdown_with_parameters")
                    .with_params(1)
                    .with_body::<Self, _>(|this| {
                        this.parameter_calls.fetch_add(1, Ordering::SeqCst);
                    }),
            )
    }
}

#[tokio::test]
async fn test_lifecycle_shutdown_with_invalid_declarations() {
    let invalid = Arc::new(InvalidTeardowns::default());

    // 解析此类型不得向调用方抛出错误
    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("invalid", ManagedInstance::of_arc(invalid.clone()))
        .build()
        .await
        .unwrap();

    let report = container.close().await;
    assert!(report.is_clean());
    assert_eq!(invalid.return_value_calls.load(Ordering::SeqCst), 0);
    assert_eq!(invalid.static_calls.load(Ordering::SeqCst), 0);
    assert_eq!(invalid.parameter_calls.load(Ordering::SeqCst), 0);
}

/// 子类覆盖父类回收方法的组件
///
/// 父类声明 shutdown / another_shutdown / yet_another_shutdown 三个标记方法；
/// 子类带标记地覆盖 shutdown，并以不带标记的覆盖抑制 yet_another_shutdown。
#[derive(Debug, Default)]
struct ChildService {
    invocations: Mutex<Vec<&'static str>>,
}

impl ChildService {
    fn record(&self, name: &'static str) {
        self.invocations.lock().unwrap().push(name);
    }
}

impl HasTeardownShape for ChildService {
    fn teardown_shape() -> TypeShape {
        let parent = TypeShape::named("ServiceBase")
            .with_method(
                MethodShape::marked("shutdown")
                    .with_body::<ChildService, _>(|this| this.record("parent.shutdown")),
            )
            .with_method(
                MethodShape::marked("another_shutdown")
                    .with_body::<ChildService, _>(|this| this.record("parent.another_shutdown")),
            )
            .with_method(
                MethodShape::marked("yet_another_shutdown")
                    .with_body::<ChildService, _>(|this| this.record("parent.yet_another_shutdown")),
            );

        TypeShape::of::<Self>()
            .with_method(
                MethodShape::marked("shutdown")
                    .with_body::<Self, _>(|this| this.record("child.shutdown")),
            )
            .with_method(
                MethodShape::new("yet_another_shutdown")
                    .with_body::<Self, _>(|this| this.record("child.yet_another_shutdown")),
            )
            .with_ancestor(parent)
    }
}

#[tokio::test]
async fn test_lifecycle_shutdown_inheritance() {
    let child = Arc::new(ChildService::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("child", ManagedInstance::of_arc(child.clone()))
        .build()
        .await
        .unwrap();

    assert!(child.invocations.lock().unwrap().is_empty());

    let report = container.close().await;
    assert!(report.is_clean());

    // 覆盖方法只在覆盖处执行一次，随后是父类未被覆盖的标记方法；
    // 不带标记的覆盖抑制了父类的 yet_another_shutdown
    let invocations = child.invocations.lock().unwrap();
    assert_eq!(
        *invocations,
        vec!["child.shutdown", "parent.another_shutdown"]
    );
}

/// 标记只出现在契约签名上的组件
#[derive(Debug, Default)]
struct ContractBacked {
    destroy_calls: AtomicUsize,
}

impl HasTeardownShape for ContractBacked {
    fn teardown_shape() -> TypeShape {
        // 契约上的 destroy 携带标记但没有方法体；
        // 具体实现的 destroy 有方法体但不带标记
        let contract = TypeShape::named("RetireContract")
            .with_method(MethodShape::marked("destroy"));

        TypeShape::of::<Self>()
            .with_method(MethodShape::new("destroy").with_body::<Self, _>(|this| {
                this.destroy_calls.fetch_add(1, Ordering::SeqCst);
            }))
            .with_ancestor(contract)
    }
}

#[tokio::test]
async fn test_lifecycle_contract_declared_marker_is_not_invoked() {
    let instance = Arc::new(ContractBacked::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("contract_backed", ManagedInstance::of_arc(instance.clone()))
        .build()
        .await
        .unwrap();

    let report = container.close().await;
    assert!(report.is_clean());
    assert_eq!(instance.destroy_calls.load(Ordering::SeqCst), 0);
}

/// 在契约方法的具体覆盖上携带标记的组件
#[derive(Debug, Default)]
struct RunnableLike {
    run_calls: AtomicUsize,
}

impl HasTeardownShape for RunnableLike {
    fn teardown_shape() -> TypeShape {
        let contract = TypeShape::named("TaskContract").with_method(MethodShape::new("run"));

        TypeShape::of::<Self>()
            .with_method(MethodShape::marked("run").with_body::<Self, _>(|this| {
                this.run_calls.fetch_add(1, Ordering::SeqCst);
            }))
            .with_ancestor(contract)
    }
}

#[tokio::test]
async fn test_lifecycle_marker_on_concrete_override_is_invoked() {
    let instance = Arc::new(RunnableLike::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("runnable", ManagedInstance::of_arc(instance.clone()))
        .build()
        .await
        .unwrap();

    assert_eq!(instance.run_calls.load(Ordering::SeqCst), 0);
    container.close().await;
    assert_eq!(instance.run_calls.load(Ordering::SeqCst), 1);
}

/// 同时实现内建关闭协议并携带无关显式标记的组件
#[derive(Debug, Default)]
struct CloseableBuffer {
    close_calls: AtomicUsize,
    shutdown_calls: AtomicUsize,
}

impl CloseableResource for CloseableBuffer {
    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Err("关闭缓冲区失败".into())
    }
}

impl HasTeardownShape for CloseableBuffer {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>()
            .with_close_protocol::<Self>()
            .with_method(MethodShape::marked("shutdown").with_body::<Self, _>(|this| {
                this.shutdown_calls.fetch_add(1, Ordering::SeqCst);
            }))
    }
}

#[tokio::test]
async fn test_lifecycle_closeable_takes_precedence() {
    let buffer = Arc::new(CloseableBuffer::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("buffer", ManagedInstance::of_arc(buffer.clone()))
        .build()
        .await
        .unwrap();

    assert_eq!(buffer.close_calls.load(Ordering::SeqCst), 0);

    let report = container.close().await;

    // close 是该实例唯一的动作，恰好执行一次；显式标记被抑制
    assert_eq!(buffer.close_calls.load(Ordering::SeqCst), 1);
    assert_eq!(buffer.shutdown_calls.load(Ordering::SeqCst), 0);

    // close 的失败被捕获上报，而不是中断关闭序列
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].action, "close");
}

/// 没有任何标记的普通组件
#[derive(Debug, Default)]
struct PlainComponent;

impl HasTeardownShape for PlainComponent {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>()
    }
}

#[tokio::test]
async fn test_type_without_markers_yields_no_actions() -> anyhow::Result<()> {
    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("plain", ManagedInstance::of(PlainComponent))
        .build()
        .await?;

    assert_eq!(container.managed_count(), 1);
    let report = container.close().await;
    assert!(report.is_clean());
    Ok(())
}

#[tokio::test]
async fn test_one_failing_instance_does_not_block_others() {
    let buffer = Arc::new(CloseableBuffer::default());
    let foo = Arc::new(Foo::default());

    let container = ContainerBuilder::new()
        .with_environment(Environment::new())
        .register_instance("buffer", ManagedInstance::of_arc(buffer.clone()))
        .register_instance("foo", ManagedInstance::of_arc(foo.clone()))
        .build()
        .await
        .unwrap();

    let report = container.close().await;

    // buffer 的关闭失败不影响 foo 的回收
    assert_eq!(report.failures().len(), 1);
    assert_eq!(buffer.close_calls.load(Ordering::SeqCst), 1);
    assert_eq!(foo.shutdown_calls.load(Ordering::SeqCst), 1);
}
