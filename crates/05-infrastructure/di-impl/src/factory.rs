//! 工厂表
//!
//! 将指令中的工厂类型映射到实际的 [`ComponentFactory`] 实现。

use crate::context::RegistrationContext;
use crate::interceptor::InterceptorChain;
use di_abstractions::{ComponentFactory, ComponentResolver, Instance};
use infrastructure_common::{DependencyError, TypeRef};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 工厂表
#[derive(Default, Clone)]
pub struct FactoryTable {
    factories: HashMap<TypeRef, Arc<dyn ComponentFactory<Instance>>>,
}

impl FactoryTable {
    /// 创建空的工厂表
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// 注册工厂
    ///
    /// 泛型工厂需要按封闭后的类型分别注册。
    pub fn register<F>(&mut self, factory_type: TypeRef, factory: F)
    where
        F: ComponentFactory<Instance> + 'static,
    {
        debug!("注册工厂: {}", factory_type);
        self.factories.insert(factory_type, Arc::new(factory));
    }

    /// 注册工厂（构建器风格）
    pub fn with_factory<F>(mut self, factory_type: TypeRef, factory: F) -> Self
    where
        F: ComponentFactory<Instance> + 'static,
    {
        self.register(factory_type, factory);
        self
    }

    /// 是否包含指定的工厂类型
    pub fn contains(&self, factory_type: &TypeRef) -> bool {
        self.factories.contains_key(factory_type)
    }

    /// 获取工厂
    pub fn get(&self, factory_type: &TypeRef) -> Option<&Arc<dyn ComponentFactory<Instance>>> {
        self.factories.get(factory_type)
    }

    /// 使用指令声明的工厂构建实例，然后应用拦截器
    pub fn build(
        &self,
        directive: &RegistrationContext,
        resolver: &dyn ComponentResolver,
        interceptors: Option<&InterceptorChain<Instance>>,
    ) -> Result<Instance, DependencyError> {
        let factory_type = directive
            .factory_type()
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: format!("{} 的工厂", directive.from_type()),
            })?;
        let factory = self
            .get(factory_type)
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: factory_type.to_string(),
            })?;

        debug!("使用工厂 {} 构建 {}", factory_type, directive.constructed_type());
        let instance = factory.build(resolver)?;

        Ok(match interceptors {
            Some(chain) => chain.wrap(instance, directive),
            None => instance,
        })
    }
}

impl std::fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryTable")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
