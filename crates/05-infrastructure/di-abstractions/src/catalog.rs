//! 类型元数据目录抽象接口

use infrastructure_common::{TypeDefinition, TypeRef};

/// 类型目录 trait
///
/// 按完整名称查找类型定义。目录中没有定义的类型视为没有接口和基类的普通类。
pub trait TypeCatalog: Send + Sync {
    /// 获取类型定义
    fn definition(&self, full_name: &str) -> Option<&TypeDefinition>;

    /// 获取类型引用对应的定义
    fn definition_of(&self, ty: &TypeRef) -> Option<&TypeDefinition> {
        match ty {
            TypeRef::Named { path, .. } => self.definition(path),
            TypeRef::Param(_) => None,
        }
    }

    /// 是否包含指定类型
    fn contains(&self, full_name: &str) -> bool {
        self.definition(full_name).is_some()
    }
}
