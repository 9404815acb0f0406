//! 类型回收形状定义
//!
//! 将一个类型的回收声明建模为显式数据：自身声明的方法、有序祖先链、
//! 以及可选的内建关闭协议。引擎只消费这份数据，不做运行时反射。

use crate::errors::TeardownError;
use crate::metadata::TypeInfo;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// 动作槽位
///
/// 同名同参数个数的方法在整条祖先链上共享一个槽位，
/// 最终只有最派生的声明会被调度。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionSlot {
    /// 方法名称
    pub name: String,
    /// 参数个数
    pub arity: usize,
}

/// 方法体调用器函数类型
type BodyFn = dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), TeardownError> + Send + Sync;

/// 方法体
///
/// 把一个具体类型上的方法包装为对 `dyn Any` 实例的调用。
/// 实例类型与目标类型不匹配时返回 [`TeardownError::TargetTypeMismatch`]。
#[derive(Clone)]
pub struct MethodBody {
    target: &'static str,
    invoker: Arc<BodyFn>,
}

impl MethodBody {
    /// 从不会失败的方法创建方法体
    pub fn of<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::fallible::<T, _>(move |instance| {
            f(instance);
            Ok(())
        })
    }

    /// 从可能失败的方法创建方法体
    pub fn fallible<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
    {
        let target = std::any::type_name::<T>();
        Self {
            target,
            invoker: Arc::new(move |instance| {
                let typed = instance.downcast_ref::<T>().ok_or_else(|| {
                    TeardownError::TargetTypeMismatch {
                        expected: target.to_string(),
                    }
                })?;
                f(typed).map_err(|source| TeardownError::ActionFailed {
                    type_name: target.to_string(),
                    source,
                })
            }),
        }
    }

    /// 在实例上调用方法体
    pub fn invoke(&self, instance: &(dyn Any + Send + Sync)) -> Result<(), TeardownError> {
        (self.invoker)(instance)
    }

    /// 获取目标类型名称
    pub fn target_type(&self) -> &'static str {
        self.target
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodBody")
            .field("target", &self.target)
            .field("invoker", &"<function>")
            .finish()
    }
}

/// 方法形状
///
/// 描述某个类型上声明的一个候选方法及其签名特征。
#[derive(Debug, Clone)]
pub struct MethodShape {
    /// 方法名称
    pub name: String,
    /// 参数个数
    pub param_count: usize,
    /// 是否为静态方法（无实例接收者）
    pub is_static: bool,
    /// 是否无返回值
    pub returns_unit: bool,
    /// 是否携带回收标记
    pub has_teardown_marker: bool,
    /// 具体方法体；能力契约上的纯签名声明没有方法体
    pub body: Option<MethodBody>,
}

impl MethodShape {
    /// 创建新的方法形状
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_count: 0,
            is_static: false,
            returns_unit: true,
            has_teardown_marker: false,
            body: None,
        }
    }

    /// 创建携带回收标记的方法形状
    pub fn marked(name: impl Into<String>) -> Self {
        Self::new(name).with_marker()
    }

    /// 设置回收标记
    pub fn with_marker(mut self) -> Self {
        self.has_teardown_marker = true;
        self
    }

    /// 设置参数个数
    pub fn with_params(mut self, count: usize) -> Self {
        self.param_count = count;
        self
    }

    /// 标记为静态方法
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// 标记为有返回值
    pub fn with_return_value(mut self) -> Self {
        self.returns_unit = false;
        self
    }

    /// 设置具体方法体
    pub fn with_body<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.body = Some(MethodBody::of::<T, _>(f));
        self
    }

    /// 设置可能失败的具体方法体
    pub fn with_fallible_body<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
    {
        self.body = Some(MethodBody::fallible::<T, _>(f));
        self
    }

    /// 获取方法所属的动作槽位
    pub fn slot(&self) -> ActionSlot {
        ActionSlot {
            name: self.name.clone(),
            arity: self.param_count,
        }
    }
}

/// 内建可关闭资源契约
///
/// 实现此 trait 的受管实例遵循标准的单方法关闭协议，
/// 无需显式标记即可被引擎识别。
pub trait CloseableResource: Send + Sync {
    /// 关闭资源
    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// 类型回收形状
///
/// 一个类型节点：自身类型信息、按声明顺序排列的方法、
/// 有序的直接祖先（父类在前，能力契约按声明顺序在后）。
#[derive(Debug, Clone)]
pub struct TypeShape {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 自身声明的方法，按声明顺序
    pub methods: Vec<MethodShape>,
    /// 直接祖先，按声明顺序
    pub ancestors: Vec<TypeShape>,
    /// 内建关闭协议适配器
    pub close_protocol: Option<MethodBody>,
}

impl TypeShape {
    /// 创建新的类型形状
    pub fn new(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            methods: Vec::new(),
            ancestors: Vec::new(),
            close_protocol: None,
        }
    }

    /// 从具体类型创建形状
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeInfo::of::<T>())
    }

    /// 从名称创建形状
    ///
    /// 用于没有对应 Rust 类型的祖先节点。
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::new(TypeInfo::from_name(name.as_ref()))
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodShape) -> Self {
        self.methods.push(method);
        self
    }

    /// 添加直接祖先
    pub fn with_ancestor(mut self, ancestor: TypeShape) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    /// 声明类型实现内建关闭协议
    pub fn with_close_protocol<T>(mut self) -> Self
    where
        T: CloseableResource + Any + Send + Sync,
    {
        self.close_protocol = Some(MethodBody::fallible::<T, _>(|instance| instance.close()));
        self
    }

    /// 线性化祖先链
    ///
    /// 先序深度优先遍历：自身在前，随后按声明顺序展开各祖先子树，
    /// 按首次出现去重。对同一形状的重复调用产生相同的顺序。
    pub fn linearize(&self) -> Vec<&TypeShape> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        self.collect_chain(&mut chain, &mut seen);
        chain
    }

    fn collect_chain<'a>(&'a self, chain: &mut Vec<&'a TypeShape>, seen: &mut HashSet<String>) {
        if !seen.insert(self.type_info.module_path.clone()) {
            return;
        }
        chain.push(self);
        for ancestor in &self.ancestors {
            ancestor.collect_chain(chain, seen);
        }
    }

    /// 查找链上首个内建关闭协议
    ///
    /// 返回声明该协议的类型信息及其适配器。
    pub fn close_adapter(&self) -> Option<(&TypeInfo, &MethodBody)> {
        self.linearize()
            .into_iter()
            .find_map(|shape| shape.close_protocol.as_ref().map(|body| (&shape.type_info, body)))
    }
}

/// 可提供回收形状的类型 trait
///
/// 具体类型实现此 trait 以静态注册自己的回收声明，
/// 替代运行时反射式的标记发现。
pub trait HasTeardownShape: Send + Sync + 'static {
    /// 获取类型的回收形状
    fn teardown_shape() -> TypeShape;
}
