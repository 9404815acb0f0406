//! # Lifecycle Common
//!
//! 这个 crate 提供了 Vessel 生命周期引擎的公共数据模型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 类型元数据
//! - [`TypeShape`] - 类型的声明式回收形状（方法、祖先链、内建关闭协议）
//! - [`ShutdownAction`] - 已解析的回收动作
//! - [`Environment`] - 运行时环境事实描述符
//!
//! ## 设计原则
//!
//! - 标记元数据通过显式注册获得，不依赖运行时反射
//! - 祖先链建模为显式有序列表，遍历顺序稳定且确定
//! - 错误按类别划分，回收执行失败永远不会中断容器关闭序列

pub mod action;
pub mod environment;
pub mod errors;
pub mod metadata;
pub mod shape;

pub use action::*;
pub use environment::*;
pub use errors::*;
pub use metadata::*;
pub use shape::*;
