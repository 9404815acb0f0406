//! 类型形状目录实现

use dashmap::DashMap;
use lifecycle_abstractions::ShapeCatalog;
use lifecycle_common::TypeShape;
use std::any::TypeId;
use tracing::debug;

/// 内存中的类型形状目录
///
/// (运行时类型 -> 回收形状) 的并发安全注册表。
/// 形状在图构建前静态登记，挂钩在实例创建时查询。
#[derive(Debug, Default)]
pub struct InMemoryShapeCatalog {
    shapes: DashMap<TypeId, TypeShape>,
}

impl InMemoryShapeCatalog {
    /// 创建新的形状目录
    pub fn new() -> Self {
        Self {
            shapes: DashMap::new(),
        }
    }
}

impl ShapeCatalog for InMemoryShapeCatalog {
    fn register_shape(&self, type_id: TypeId, shape: TypeShape) {
        debug!("登记类型形状: {}", shape.type_info.name);
        self.shapes.insert(type_id, shape);
    }

    fn shape_of(&self, type_id: TypeId) -> Option<TypeShape> {
        self.shapes.get(&type_id).map(|entry| entry.value().clone())
    }

    fn contains(&self, type_id: TypeId) -> bool {
        self.shapes.contains_key(&type_id)
    }

    fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}
