//! 组件工厂抽象接口
//!
//! 工厂是一个多态的 `build(resolver)` 能力，由实现类型直接满足。

use crate::resolver::ComponentResolver;
use infrastructure_common::DependencyError;

/// 工厂构建契约的类型名称
///
/// 工厂类型必须可赋值给 `di::ComponentFactory<T>`，其中 `T` 是被构建的类型。
pub const COMPONENT_FACTORY_CONTRACT: &str = "di::ComponentFactory";

/// 组件工厂 trait
pub trait ComponentFactory<T>: Send + Sync {
    /// 构建组件实例
    fn build(&self, resolver: &dyn ComponentResolver) -> Result<T, DependencyError>;
}

impl<T, F> ComponentFactory<T> for F
where
    F: Fn(&dyn ComponentResolver) -> Result<T, DependencyError> + Send + Sync,
{
    fn build(&self, resolver: &dyn ComponentResolver) -> Result<T, DependencyError> {
        self(resolver)
    }
}

/// 按 Key 获取组件的工厂 trait
pub trait KeyedComponentFactory<T>: Send + Sync {
    /// 获取指定 Key 的组件，Key 未注册时返回错误
    fn get_by_key(&self, key: &str) -> Result<T, DependencyError>;

    /// 尝试获取指定 Key 的组件，Key 未注册时返回 `None`
    fn try_get_by_key(&self, key: &str) -> Option<T>;

    /// 指定 Key 是否已注册
    fn is_registered(&self, key: &str) -> bool;
}
