//! # Lifecycle Implementation
//!
//! 生命周期引擎的具体实现：标记检查器、回收动作解析器、
//! 回收注册表、类型形状目录、条件求值器以及容器生命周期挂钩。
//!
//! ## 核心实现
//!
//! - [`DefaultMarkerInspector`] - 按槽位解析覆盖关系的标记检查器
//! - [`DefaultShutdownActionResolver`] - 有序、去重的动作解析器
//! - [`InMemoryShutdownRegistry`] - 容器内回收注册表
//! - [`InMemoryShapeCatalog`] - 类型形状目录
//! - [`DefaultConditionEvaluator`] - fail-closed 条件求值器
//! - [`DefaultLifecycleHook`] - 容器集成挂钩

pub mod catalog;
pub mod condition;
pub mod conditions;
pub mod hook;
pub mod inspector;
pub mod registry;
pub mod resolver;

pub use catalog::InMemoryShapeCatalog;
pub use condition::DefaultConditionEvaluator;
pub use conditions::{OnCargoTest, OnFactEquals, OnFactPresent, OnNextest};
pub use hook::DefaultLifecycleHook;
pub use inspector::DefaultMarkerInspector;
pub use registry::InMemoryShutdownRegistry;
pub use resolver::DefaultShutdownActionResolver;
