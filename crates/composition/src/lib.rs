//! # 容器组合层
//!
//! 这个 crate 把生命周期引擎的各个部件组合成面向容器的完整流程：
//! 图构建期的条件剪除、实例创建时的回收动作登记、
//! 容器关闭时的统一回收与失败聚合。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 注册绑定（直接实例或提供者函数）及其激活条件
//! - **条件剪除**: 未激活的绑定在实例化之前被整体移除
//! - **生命周期容器**: 持有受管实例，关闭时按构造顺序回收
//! - **关闭报告**: 聚合所有失败的回收动作供调用方检视
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use lifecycle_composition::{ContainerBuilder, ManagedInstance};
//! use lifecycle_impl::OnFactPresent;
//! use lifecycle_common::{Environment, HasTeardownShape, MethodShape, TypeShape};
//!
//! #[derive(Debug)]
//! struct ConnectionPool;
//!
//! impl HasTeardownShape for ConnectionPool {
//!     fn teardown_shape() -> TypeShape {
//!         TypeShape::of::<Self>()
//!             .with_method(MethodShape::marked("shutdown").with_body::<Self, _>(|_pool| {
//!                 // 释放连接
//!             }))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ContainerBuilder::new()
//!         .with_environment(Environment::detect())
//!         .register_instance("pool", ManagedInstance::of(ConnectionPool))
//!         .register_guarded_provider("debug_probe", OnFactPresent::new("debug.enabled"), || {
//!             Ok(ManagedInstance::new(String::from("probe")))
//!         })
//!         .build()
//!         .await?;
//!
//!     // 使用容器……
//!
//!     let report = container.close().await;
//!     assert!(report.is_clean());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod container;

pub use builder::{ContainerBuilder, ManagedInstance};
pub use container::{LifecycleContainer, ShutdownReport};

// 重新导出错误类型
pub use lifecycle_common::{LifecycleError, LifecycleResult};
