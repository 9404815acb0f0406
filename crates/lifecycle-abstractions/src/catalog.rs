//! 类型形状目录抽象接口

use lifecycle_common::{HasTeardownShape, TypeShape};
use std::any::TypeId;

/// 类型形状目录 trait
///
/// (运行时类型 -> 回收形状) 的显式注册表，替代运行时反射。
/// 挂钩在实例创建时通过目录查找形状；查不到即为解析失败。
pub trait ShapeCatalog: Send + Sync {
    /// 注册类型形状
    fn register_shape(&self, type_id: TypeId, shape: TypeShape);

    /// 查找类型形状
    fn shape_of(&self, type_id: TypeId) -> Option<TypeShape>;

    /// 检查类型是否已注册
    fn contains(&self, type_id: TypeId) -> bool;

    /// 获取已注册的形状数量
    fn shape_count(&self) -> usize;
}

/// 类型形状目录扩展方法
pub trait ShapeCatalogExt: ShapeCatalog {
    /// 按类型注册形状
    fn register_type<T: HasTeardownShape>(&self) {
        self.register_shape(TypeId::of::<T>(), T::teardown_shape());
    }
}

impl<C: ShapeCatalog + ?Sized> ShapeCatalogExt for C {}
