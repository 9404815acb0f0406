//! 容器构建器
//!
//! 负责收集绑定注册，在构建时完成条件剪除与实例登记。

use crate::container::{ActiveBinding, LifecycleContainer};
use lifecycle_abstractions::{
    ConditionEvaluator, ConditionPredicate, LifecycleHook, ResolutionFailurePolicy, ShapeCatalog,
    ShapeCatalogExt, ShutdownRegistry,
};
use lifecycle_common::{
    Environment, HasTeardownShape, LifecycleError, LifecycleResult, TypeInfo, TypeShape,
};
use lifecycle_impl::{
    DefaultConditionEvaluator, DefaultLifecycleHook, DefaultShutdownActionResolver,
    InMemoryShapeCatalog, InMemoryShutdownRegistry,
};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info};

/// 受管实例描述
///
/// 绑定实例化的产物：实例句柄、类型信息，以及可选的内联回收形状。
/// 没有内联形状的实例依赖构建器目录中已登记的形状；
/// 两者都没有时按解析失败处理。
pub struct ManagedInstance {
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
    pub(crate) type_info: TypeInfo,
    pub(crate) shape: Option<TypeShape>,
}

impl ManagedInstance {
    /// 包装不带回收形状的实例
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// 包装实例并附带内联回收形状
    pub fn with_shape<T: Any + Send + Sync>(value: T, shape: TypeShape) -> Self {
        Self::arc_with_shape(Arc::new(value), shape)
    }

    /// 包装实现 [`HasTeardownShape`] 的实例
    pub fn of<T: HasTeardownShape + Any>(value: T) -> Self {
        Self::of_arc(Arc::new(value))
    }

    /// 包装已有共享句柄的实例
    pub fn from_arc<T: Any + Send + Sync>(instance: Arc<T>) -> Self {
        Self {
            instance,
            type_info: TypeInfo::of::<T>(),
            shape: None,
        }
    }

    /// 包装已有共享句柄的实例并附带内联回收形状
    pub fn arc_with_shape<T: Any + Send + Sync>(instance: Arc<T>, shape: TypeShape) -> Self {
        Self {
            instance,
            type_info: TypeInfo::of::<T>(),
            shape: Some(shape),
        }
    }

    /// 包装实现 [`HasTeardownShape`] 的共享句柄
    pub fn of_arc<T: HasTeardownShape + Any>(instance: Arc<T>) -> Self {
        Self::arc_with_shape(instance, T::teardown_shape())
    }
}

/// 绑定提供者函数类型
type ProviderFn = Box<dyn FnOnce() -> LifecycleResult<ManagedInstance> + Send>;

/// 绑定的实例来源
enum BindingSource {
    /// 直接构造的实例
    Instance(ManagedInstance),
    /// 提供者方法；被剪除的绑定永远不会调用它
    Provider(ProviderFn),
}

/// 绑定注册信息
struct BindingRegistration {
    name: String,
    condition: Option<Arc<dyn ConditionPredicate>>,
    source: BindingSource,
}

/// 容器构建器
///
/// 绑定按注册顺序实例化，回收顺序与之一致。
pub struct ContainerBuilder {
    environment: Option<Environment>,
    bindings: Vec<BindingRegistration>,
    policy: ResolutionFailurePolicy,
    catalog: Arc<InMemoryShapeCatalog>,
}

impl ContainerBuilder {
    /// 创建新的容器构建器
    pub fn new() -> Self {
        Self {
            environment: None,
            bindings: Vec::new(),
            policy: ResolutionFailurePolicy::default(),
            catalog: Arc::new(InMemoryShapeCatalog::new()),
        }
    }

    /// 设置环境描述符
    ///
    /// 未设置时使用进程环境快照。
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 设置解析失败处理策略
    pub fn with_resolution_policy(mut self, policy: ResolutionFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 预先登记类型的回收形状
    pub fn register_shape<T: HasTeardownShape>(self) -> Self {
        self.catalog.register_type::<T>();
        self
    }

    /// 注册直接构造的绑定
    pub fn register_instance(mut self, name: impl Into<String>, instance: ManagedInstance) -> Self {
        self.bindings.push(BindingRegistration {
            name: name.into(),
            condition: None,
            source: BindingSource::Instance(instance),
        });
        self
    }

    /// 注册提供者绑定
    pub fn register_provider<F>(mut self, name: impl Into<String>, provider: F) -> Self
    where
        F: FnOnce() -> LifecycleResult<ManagedInstance> + Send + 'static,
    {
        self.bindings.push(BindingRegistration {
            name: name.into(),
            condition: None,
            source: BindingSource::Provider(Box::new(provider)),
        });
        self
    }

    /// 注册带激活条件的直接绑定
    pub fn register_guarded_instance(
        mut self,
        name: impl Into<String>,
        condition: impl ConditionPredicate + 'static,
        instance: ManagedInstance,
    ) -> Self {
        self.bindings.push(BindingRegistration {
            name: name.into(),
            condition: Some(Arc::new(condition)),
            source: BindingSource::Instance(instance),
        });
        self
    }

    /// 注册带激活条件的提供者绑定
    pub fn register_guarded_provider<F>(
        mut self,
        name: impl Into<String>,
        condition: impl ConditionPredicate + 'static,
        provider: F,
    ) -> Self
    where
        F: FnOnce() -> LifecycleResult<ManagedInstance> + Send + 'static,
    {
        self.bindings.push(BindingRegistration {
            name: name.into(),
            condition: Some(Arc::new(condition)),
            source: BindingSource::Provider(Box::new(provider)),
        });
        self
    }

    /// 构建容器
    ///
    /// 依次完成：条件剪除（实例化之前）、幸存绑定实例化、
    /// 回收动作解析与登记。
    pub async fn build(self) -> LifecycleResult<LifecycleContainer> {
        let environment = self.environment.unwrap_or_else(Environment::detect);
        let evaluator = DefaultConditionEvaluator::new();

        let registry: Arc<dyn ShutdownRegistry> = Arc::new(InMemoryShutdownRegistry::new());
        let catalog: Arc<dyn ShapeCatalog> = self.catalog.clone();
        let hook = Arc::new(
            DefaultLifecycleHook::new(
                catalog,
                Arc::new(DefaultShutdownActionResolver::new()),
                registry,
            )
            .with_policy(self.policy),
        );

        let mut active = Vec::new();
        let mut pruned = Vec::new();

        for binding in self.bindings {
            if let Some(condition) = &binding.condition {
                if !evaluator.is_active(condition.as_ref(), &environment) {
                    debug!("绑定未激活，从对象图中移除: {}", binding.name);
                    pruned.push(binding.name);
                    continue;
                }
            }

            let managed = match binding.source {
                BindingSource::Instance(instance) => instance,
                BindingSource::Provider(provider) => {
                    provider().map_err(|error| LifecycleError::BindingConstructionFailed {
                        binding: binding.name.clone(),
                        message: error.to_string(),
                    })?
                }
            };

            // 内联形状在实例化时登记到目录；构造路径不影响后续解析
            if let Some(shape) = managed.shape {
                self.catalog.register_shape(managed.type_info.id, shape);
            }

            hook.on_instance_created(managed.instance.clone(), managed.type_info.clone())
                .await?;

            active.push(ActiveBinding {
                name: binding.name,
                type_info: managed.type_info,
                instance: managed.instance,
            });
        }

        info!(
            "容器构建完成: {} 个活动绑定, {} 个被剪除",
            active.len(),
            pruned.len()
        );
        Ok(LifecycleContainer::assemble(environment, hook, active, pruned))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
