//! 注册指令构建
//!
//! [`RegistrationContext`] 是一个属性实例加上它所修饰的实现类型解析后的结果。
//! 构建时按固定顺序执行校验规则，第一条失败的规则决定错误，其余规则跳过。
//! 业务规则违例不会导致构建失败，而是记录在指令中。

use crate::generics::close_generic;
use crate::hierarchy::TypeHierarchy;
use crate::interceptor::InterceptorMatcher;
use di_abstractions::{RegistrationAttribute, RegistrationKind, COMPONENT_FACTORY_CONTRACT};
use infrastructure_common::{GenericClosingError, Lifetime, TypeRef, ValidationError};
use std::sync::Arc;
use tracing::debug;

/// 集合成员信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionMembership {
    pub is_collection: bool,
    pub order: i32,
}

/// 注册指令
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationContext {
    attribute: RegistrationAttribute,
    to_type: TypeRef,
    from_type: Option<TypeRef>,
    is_concrete: bool,
    mock_type: Option<TypeRef>,
    factory_type: Option<TypeRef>,
    collection: CollectionMembership,
    key: Option<String>,
    replace_services: bool,
    is_intercepted: bool,
    mock_mode: bool,
    base_types: Vec<TypeRef>,
    original_to_type: TypeRef,
    generic_argument: Option<TypeRef>,
    validation: Option<ValidationError>,
}

impl RegistrationContext {
    /// 构建注册指令并执行校验
    pub fn new(
        attribute: &RegistrationAttribute,
        to_type: &TypeRef,
        mock_mode: bool,
        hierarchy: &TypeHierarchy,
        interceptors: Option<&dyn InterceptorMatcher>,
    ) -> Self {
        let mock_type = attribute.mock.clone();
        let factory_type = if mock_mode && mock_type.is_some() {
            None
        } else {
            attribute.factory.clone()
        };

        let mut context = Self {
            attribute: attribute.clone(),
            to_type: to_type.clone(),
            from_type: attribute.for_type.clone(),
            is_concrete: attribute.concrete,
            mock_type,
            factory_type,
            collection: CollectionMembership {
                is_collection: attribute.of_collection,
                order: attribute.order,
            },
            key: attribute.key.clone(),
            replace_services: attribute.replace_services,
            is_intercepted: interceptors
                .is_some_and(|matcher| matcher.has_interceptors(attribute, to_type)),
            mock_mode,
            base_types: hierarchy.base_types(attribute, to_type),
            original_to_type: to_type.clone(),
            generic_argument: attribute.generic_argument.clone(),
            validation: None,
        };

        context.validation = context.init_and_validate(hierarchy).err();
        context
    }

    fn init_and_validate(&mut self, hierarchy: &TypeHierarchy) -> Result<(), ValidationError> {
        self.ensure_no_explicit_concrete_type()?;
        self.validate_and_disambiguate_base_type(hierarchy)?;
        self.validate_and_handle_generics()?;
        self.ensure_concrete_has_no_mock()?;
        self.ensure_mock_compatible(hierarchy)?;
        self.ensure_explicit_type_implemented(hierarchy)?;
        self.ensure_no_overly_complex_registrations()?;
        self.ensure_factory_valid(hierarchy)?;
        self.ensure_order_is_used_with_collection()?;
        self.ensure_intercepted_implements_interface(hierarchy)?;
        self.ensure_intercepted_not_concrete()?;
        self.ensure_intercepted_not_generic()?;
        self.ensure_mock_is_concrete(hierarchy)?;
        self.ensure_mock_does_not_derive_from_live(hierarchy)?;
        self.ensure_not_recursive()
    }

    fn type_name(&self) -> String {
        self.original_to_type.to_string()
    }

    fn ensure_no_explicit_concrete_type(&self) -> Result<(), ValidationError> {
        if !self.is_concrete || self.from_type.is_none() {
            return Ok(());
        }

        Err(ValidationError::ConcreteWithExplicitFor {
            type_name: self.type_name(),
        })
    }

    fn validate_and_disambiguate_base_type(
        &mut self,
        hierarchy: &TypeHierarchy,
    ) -> Result<(), ValidationError> {
        if self.from_type.is_some() {
            return Ok(());
        }

        // 托管服务按实现类型自注册，共享同一接口的多个托管服务互不冲突
        if self.is_concrete
            || self.attribute.kind == RegistrationKind::HostedService
            || self.base_types.is_empty()
        {
            self.is_concrete = true;
            self.from_type = Some(self.to_type.clone());
            return Ok(());
        }

        if let [single] = self.base_types.as_slice() {
            self.from_type = Some(single.clone());
            return Ok(());
        }

        let interfaces: Vec<&TypeRef> = self
            .base_types
            .iter()
            .filter(|ty| hierarchy.is_interface(ty))
            .collect();
        if let [single] = interfaces.as_slice() {
            self.from_type = Some((*single).clone());
            return Ok(());
        }

        Err(ValidationError::AmbiguousBaseType {
            type_name: self.type_name(),
            attribute: self.attribute.attribute_name().to_string(),
            implementation: self.to_type.short_name().to_string(),
            candidates: self.base_types.iter().map(TypeRef::display_name).collect(),
        })
    }

    fn validate_and_handle_generics(&mut self) -> Result<(), ValidationError> {
        let Some(from_type) = self.from_type.clone() else {
            return Ok(());
        };
        if !from_type.is_generic() {
            return Ok(());
        }

        if let Some(factory_type) = self.factory_type.clone().filter(TypeRef::is_generic) {
            let Some(argument) = self.generic_argument.clone() else {
                return Err(ValidationError::MissingGenericArgument {
                    type_name: self.type_name(),
                });
            };

            if argument.is_generic() {
                return Err(ValidationError::GenericArgumentIsGeneric {
                    type_name: self.type_name(),
                    argument: argument.to_string(),
                });
            }

            if from_type.arity() > 1 {
                return Err(ValidationError::MultipleGenericParameters {
                    type_name: self.type_name(),
                    generic_type: from_type.to_string(),
                    arity: from_type.arity(),
                });
            }

            self.factory_type = Some(self.close(&factory_type, &argument)?);
        }

        let Some(argument) = self.generic_argument.clone() else {
            return Ok(());
        };

        // 已封闭的服务类型先还原为开放定义
        let open_from_type = if from_type.contains_generic_parameters() {
            from_type
        } else {
            from_type.definition()
        };
        self.from_type = Some(self.close(&open_from_type, &argument)?);
        self.to_type = self.close(&self.to_type.clone(), &argument)?;

        Ok(())
    }

    fn close(&self, definition: &TypeRef, argument: &TypeRef) -> Result<TypeRef, ValidationError> {
        close_generic(definition, argument).map_err(|GenericClosingError { definition, arity }| {
            ValidationError::MultipleGenericParameters {
                type_name: self.type_name(),
                generic_type: definition,
                arity,
            }
        })
    }

    fn ensure_concrete_has_no_mock(&self) -> Result<(), ValidationError> {
        match &self.mock_type {
            Some(mock) if self.is_concrete => Err(ValidationError::ConcreteWithMock {
                type_name: self.type_name(),
                mock: mock.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn ensure_mock_compatible(&self, hierarchy: &TypeHierarchy) -> Result<(), ValidationError> {
        let (Some(mock), Some(from_type)) = (&self.mock_type, &self.from_type) else {
            return Ok(());
        };
        if self.is_concrete
            || self.base_types.len() > 1
            || hierarchy.is_assignable_from(from_type, mock)
        {
            return Ok(());
        }

        Err(ValidationError::IncompatibleMock {
            type_name: self.type_name(),
            mock: mock.to_string(),
            service: from_type.to_string(),
        })
    }

    fn ensure_explicit_type_implemented(
        &self,
        hierarchy: &TypeHierarchy,
    ) -> Result<(), ValidationError> {
        let Some(from_type) = &self.from_type else {
            return Ok(());
        };

        if from_type.contains_generic_parameters()
            && hierarchy.is_assignable_to_generic_type(&self.to_type, from_type)
        {
            return Ok(());
        }

        if hierarchy.is_assignable_from(from_type, &self.to_type) {
            return Ok(());
        }

        Err(ValidationError::ExplicitTypeNotImplemented {
            type_name: self.type_name(),
            service: from_type.to_string(),
        })
    }

    fn ensure_no_overly_complex_registrations(&self) -> Result<(), ValidationError> {
        let count = usize::from(self.key.is_some())
            + usize::from(self.factory_type.is_some())
            + usize::from(self.collection.is_collection);
        if count <= 1 {
            return Ok(());
        }

        Err(ValidationError::OverlyComplexRegistration {
            type_name: self.type_name(),
        })
    }

    fn ensure_factory_valid(&self, hierarchy: &TypeHierarchy) -> Result<(), ValidationError> {
        let Some(factory_type) = &self.factory_type else {
            return Ok(());
        };

        let required = TypeRef::generic(
            COMPONENT_FACTORY_CONTRACT,
            [self.constructed_type().clone()],
        );
        if hierarchy.is_assignable_from(&required, factory_type) {
            return Ok(());
        }

        Err(ValidationError::InvalidFactory {
            type_name: self.type_name(),
            required: required.to_string(),
            factory: factory_type.to_string(),
        })
    }

    fn ensure_order_is_used_with_collection(&self) -> Result<(), ValidationError> {
        if self.collection.is_collection || self.collection.order == 0 {
            return Ok(());
        }

        Err(ValidationError::OrderWithoutCollection {
            type_name: self.type_name(),
            order: self.collection.order,
        })
    }

    fn ensure_intercepted_implements_interface(
        &self,
        hierarchy: &TypeHierarchy,
    ) -> Result<(), ValidationError> {
        let Some(from_type) = &self.from_type else {
            return Ok(());
        };
        if self.is_concrete || !self.is_intercepted || hierarchy.is_interface(from_type) {
            return Ok(());
        }

        Err(ValidationError::InterceptedNotInterface {
            type_name: self.type_name(),
            service: from_type.to_string(),
        })
    }

    fn ensure_intercepted_not_concrete(&self) -> Result<(), ValidationError> {
        if !self.is_concrete || !self.is_intercepted {
            return Ok(());
        }

        Err(ValidationError::InterceptedConcrete {
            type_name: self.type_name(),
        })
    }

    fn ensure_intercepted_not_generic(&self) -> Result<(), ValidationError> {
        let open = self
            .from_type
            .as_ref()
            .is_some_and(TypeRef::contains_generic_parameters);
        if !self.is_intercepted || !open {
            return Ok(());
        }

        Err(ValidationError::InterceptedGeneric {
            type_name: self.type_name(),
        })
    }

    fn ensure_mock_is_concrete(&self, hierarchy: &TypeHierarchy) -> Result<(), ValidationError> {
        match &self.mock_type {
            Some(mock) if hierarchy.is_abstract(mock) => Err(ValidationError::AbstractMock {
                type_name: self.type_name(),
                mock: mock.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn ensure_mock_does_not_derive_from_live(
        &self,
        hierarchy: &TypeHierarchy,
    ) -> Result<(), ValidationError> {
        match &self.mock_type {
            Some(mock) if hierarchy.is_assignable_from(&self.to_type, mock) => {
                Err(ValidationError::MockDerivesFromLive {
                    type_name: self.type_name(),
                    mock: mock.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_not_recursive(&self) -> Result<(), ValidationError> {
        if self.is_concrete || self.from_type.as_ref() != Some(&self.to_type) {
            return Ok(());
        }

        Err(ValidationError::RecursiveRegistration {
            type_name: self.type_name(),
        })
    }

    /// 注册属性
    pub fn attribute(&self) -> &RegistrationAttribute {
        &self.attribute
    }

    /// 属性种类
    pub fn kind(&self) -> RegistrationKind {
        self.attribute.kind
    }

    /// 组件生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.attribute.lifetime()
    }

    /// 实现类型（泛型封闭后）
    pub fn to_type(&self) -> &TypeRef {
        &self.to_type
    }

    /// 注册的服务类型
    ///
    /// 有效指令总能确定服务类型；基类型存在歧义的无效指令返回实现类型。
    pub fn from_type(&self) -> &TypeRef {
        self.from_type.as_ref().unwrap_or(&self.to_type)
    }

    /// 修饰的原始实现类型（泛型封闭前）
    pub fn original_to_type(&self) -> &TypeRef {
        &self.original_to_type
    }

    pub fn is_concrete(&self) -> bool {
        self.is_concrete
    }

    pub fn mock_type(&self) -> Option<&TypeRef> {
        self.mock_type.as_ref()
    }

    /// 工厂类型，Mock 模式下解析到 Mock 时为空
    pub fn factory_type(&self) -> Option<&TypeRef> {
        self.factory_type.as_ref()
    }

    pub fn collection(&self) -> CollectionMembership {
        self.collection
    }

    pub fn is_collection(&self) -> bool {
        self.collection.is_collection
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn replace_services(&self) -> bool {
        self.replace_services
    }

    pub fn is_intercepted(&self) -> bool {
        self.is_intercepted
    }

    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// 候选基类型
    pub fn base_types(&self) -> &[TypeRef] {
        &self.base_types
    }

    /// 实际构建实例时使用的类型
    ///
    /// Mock 模式下声明了 Mock 时为 Mock 类型，否则为实现类型。
    pub fn construction_type(&self) -> &TypeRef {
        match &self.mock_type {
            Some(mock) if self.mock_mode => mock,
            _ => &self.to_type,
        }
    }

    /// 工厂构建的类型：具体注册为实现类型，否则为服务类型
    pub fn constructed_type(&self) -> &TypeRef {
        if self.is_concrete {
            &self.to_type
        } else {
            self.from_type()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_none()
    }

    /// 校验错误
    pub fn error(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    /// 校验错误信息
    pub fn error_message(&self) -> Option<String> {
        self.validation.as_ref().map(ToString::to_string)
    }
}

/// 注册指令构建器
///
/// 持有构建指令需要的共享依赖：类型层次、拦截器和 Mock 模式开关。
#[derive(Clone)]
pub struct DirectiveBuilder {
    hierarchy: TypeHierarchy,
    interceptors: Option<Arc<dyn InterceptorMatcher>>,
    mock_mode: bool,
}

impl DirectiveBuilder {
    /// 创建新的构建器
    pub fn new(hierarchy: TypeHierarchy) -> Self {
        Self {
            hierarchy,
            interceptors: None,
            mock_mode: false,
        }
    }

    /// 设置 Mock 模式
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// 设置拦截器
    pub fn with_interceptors(mut self, interceptors: Arc<dyn InterceptorMatcher>) -> Self {
        self.interceptors = Some(interceptors);
        self
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// 为一个属性实例构建注册指令
    pub fn build(&self, attribute: &RegistrationAttribute, implementation: &TypeRef) -> RegistrationContext {
        let context = RegistrationContext::new(
            attribute,
            implementation,
            self.mock_mode,
            &self.hierarchy,
            self.interceptors.as_deref(),
        );

        debug!(
            "构建注册指令: {} -> {} ({}), 有效: {}",
            context.from_type(),
            context.to_type(),
            attribute.kind,
            context.is_valid()
        );
        context
    }
}

impl std::fmt::Debug for DirectiveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveBuilder")
            .field("hierarchy", &self.hierarchy)
            .field("intercepted", &self.interceptors.is_some())
            .field("mock_mode", &self.mock_mode)
            .finish()
    }
}
