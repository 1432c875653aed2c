//! 类型层次解析器
//!
//! 计算实现类型的候选基类型（接口和基类），并提供可赋值性判断。

use di_abstractions::{RegistrationAttribute, TypeCatalog};
use infrastructure_common::{TypeKind, TypeRef, NAMESPACE_SEPARATOR};
use std::sync::Arc;

/// 默认排除的命名空间前缀
pub const DEFAULT_EXCLUDED_NAMESPACE_PREFIXES: &[&str] = &["std", "core", "alloc"];

/// 类型层次解析器
#[derive(Clone)]
pub struct TypeHierarchy {
    catalog: Arc<dyn TypeCatalog>,
    excluded_namespace_prefixes: Vec<String>,
}

impl TypeHierarchy {
    /// 创建新的类型层次解析器，使用默认的排除命名空间
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self {
            catalog,
            excluded_namespace_prefixes: DEFAULT_EXCLUDED_NAMESPACE_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }

    /// 设置排除的命名空间前缀
    pub fn with_excluded_namespace_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_namespace_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// 类型目录
    pub fn catalog(&self) -> &dyn TypeCatalog {
        self.catalog.as_ref()
    }

    /// 候选基类型
    ///
    /// - `Concrete = true` 时为空
    /// - 显式指定 `For` 时只有该类型
    /// - 否则为所有（传递）实现的接口，然后是基类链，跳过排除命名空间中的类型
    ///
    /// 接口总是排在基类之前，除此之外不保证顺序。
    pub fn base_types(
        &self,
        attribute: &RegistrationAttribute,
        implementation: &TypeRef,
    ) -> Vec<TypeRef> {
        if attribute.concrete {
            return Vec::new();
        }

        if let Some(service) = &attribute.for_type {
            return vec![service.clone()];
        }

        let mut candidates: Vec<TypeRef> = self
            .interfaces(implementation)
            .into_iter()
            .filter(|ty| !self.is_excluded(ty))
            .collect();
        candidates.extend(
            self.base_classes(implementation)
                .into_iter()
                .take_while(|ty| !self.is_excluded(ty)),
        );
        candidates
    }

    /// 类型是否属于排除的命名空间
    pub fn is_excluded(&self, ty: &TypeRef) -> bool {
        let Some(namespace) = ty.namespace() else {
            return false;
        };

        self.excluded_namespace_prefixes.iter().any(|prefix| {
            namespace == prefix
                || namespace
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
        })
    }

    /// 所有直接和传递实现的接口，按声明顺序去重
    ///
    /// 包括接口继承的接口，以及基类实现的接口。
    pub fn interfaces(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut result = Vec::new();
        let mut current = Some(ty.clone());
        let mut visited = Vec::new();

        while let Some(ty) = current.take() {
            if visited.contains(&ty) {
                break;
            }
            self.collect_interfaces(&ty, &mut result);
            current = self.direct_base(&ty);
            visited.push(ty);
        }

        result
    }

    fn collect_interfaces(&self, ty: &TypeRef, result: &mut Vec<TypeRef>) {
        let Some(definition) = self.catalog.definition_of(ty) else {
            return;
        };
        let substitutions = definition.substitutions_for(ty);

        for declared in &definition.interfaces {
            let interface = declared.substitute(&substitutions);
            if result.contains(&interface) {
                continue;
            }
            result.push(interface.clone());
            self.collect_interfaces(&interface, result);
        }
    }

    /// 基类链，从直接基类开始向上
    pub fn base_classes(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut chain: Vec<TypeRef> = Vec::new();
        let mut current = self.direct_base(ty);

        while let Some(base) = current {
            if chain.contains(&base) || &base == ty {
                break;
            }
            current = self.direct_base(&base);
            chain.push(base);
        }

        chain
    }

    fn direct_base(&self, ty: &TypeRef) -> Option<TypeRef> {
        let definition = self.catalog.definition_of(ty)?;
        let base = definition.base.as_ref()?;
        Some(base.substitute(&definition.substitutions_for(ty)))
    }

    /// 类型种类，目录中没有的类型视为普通类
    pub fn kind(&self, ty: &TypeRef) -> TypeKind {
        self.catalog
            .definition_of(ty)
            .map(|definition| definition.kind)
            .unwrap_or_default()
    }

    /// 是否为接口
    pub fn is_interface(&self, ty: &TypeRef) -> bool {
        self.kind(ty) == TypeKind::Interface
    }

    /// 是否为抽象类型（抽象类或接口）
    pub fn is_abstract(&self, ty: &TypeRef) -> bool {
        matches!(self.kind(ty), TypeKind::AbstractClass | TypeKind::Interface)
    }

    /// `source` 的实例是否可以赋值给 `target`
    pub fn is_assignable_from(&self, target: &TypeRef, source: &TypeRef) -> bool {
        target == source
            || self.interfaces(source).contains(target)
            || self.base_classes(source).contains(target)
    }

    /// `given` 是否通过某个封闭实例实现了开放泛型 `generic`
    pub fn is_assignable_to_generic_type(&self, given: &TypeRef, generic: &TypeRef) -> bool {
        given.same_definition(generic)
            || self
                .interfaces(given)
                .iter()
                .any(|interface| interface.same_definition(generic))
            || self
                .base_classes(given)
                .iter()
                .any(|base| base.same_definition(generic))
    }
}

impl std::fmt::Debug for TypeHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHierarchy")
            .field("excluded_namespace_prefixes", &self.excluded_namespace_prefixes)
            .finish_non_exhaustive()
    }
}
