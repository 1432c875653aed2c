//! 组件解析器抽象接口
//!
//! 工厂通过解析器获取依赖；解析器的具体实现由容器适配器提供。

use infrastructure_common::{DependencyError, TypeRef};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 组件解析器 trait
pub trait ComponentResolver: Send + Sync {
    /// 解析指定类型的组件
    fn resolve_type(&self, ty: &TypeRef) -> Result<Instance, DependencyError>;

    /// 检查是否可以解析指定类型
    fn can_resolve(&self, ty: &TypeRef) -> bool;
}

impl dyn ComponentResolver + '_ {
    /// 解析并向下转型为具体类型
    pub fn resolve<T>(&self, ty: &TypeRef) -> Result<Arc<T>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        self.resolve_type(ty)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
                actual: ty.to_string(),
            })
    }
}

/// 按 Key 解析组件的解析器 trait
pub trait KeyedComponentResolver<T>: Send + Sync {
    /// 解析指定 Key 的组件
    fn resolve(&self, key: &str) -> Result<T, DependencyError>;

    /// 指定 Key 是否已注册
    fn is_registered(&self, key: &str) -> bool;
}
