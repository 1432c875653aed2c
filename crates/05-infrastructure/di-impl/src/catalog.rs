//! 内存类型目录

use di_abstractions::TypeCatalog;
use infrastructure_common::TypeDefinition;
use std::collections::HashMap;

/// 内存类型目录
///
/// 由构建期生成的注册表或扫描器填充。泛型类型按路径登记，与实参无关。
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeCatalog {
    types: HashMap<String, TypeDefinition>,
}

impl InMemoryTypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// 登记类型定义，同名的旧定义会被覆盖
    pub fn register(&mut self, definition: TypeDefinition) {
        self.types
            .insert(definition.full_name().to_string(), definition);
    }

    /// 登记类型定义（构建器风格）
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.register(definition);
        self
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDefinition> for InMemoryTypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.register(definition);
        }
        catalog
    }
}

impl TypeCatalog for InMemoryTypeCatalog {
    fn definition(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.types.get(full_name)
    }
}
