//! 按 Key 解析组件的工厂

use di_abstractions::{KeyedComponentFactory, KeyedComponentResolver};
use infrastructure_common::DependencyError;
use std::marker::PhantomData;

/// 默认的 Key 工厂实现
///
/// 将请求转发给底层的 [`KeyedComponentResolver`]。
pub struct DefaultKeyedComponentFactory<T, R> {
    resolver: R,
    _component: PhantomData<fn() -> T>,
}

impl<T, R> DefaultKeyedComponentFactory<T, R>
where
    R: KeyedComponentResolver<T>,
{
    /// 创建新的 Key 工厂
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            _component: PhantomData,
        }
    }

    /// 底层解析器
    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<T, R> KeyedComponentFactory<T> for DefaultKeyedComponentFactory<T, R>
where
    R: KeyedComponentResolver<T>,
{
    fn get_by_key(&self, key: &str) -> Result<T, DependencyError> {
        self.resolver.resolve(key)
    }

    fn try_get_by_key(&self, key: &str) -> Option<T> {
        if !self.resolver.is_registered(key) {
            return None;
        }
        self.resolver.resolve(key).ok()
    }

    fn is_registered(&self, key: &str) -> bool {
        self.resolver.is_registered(key)
    }
}

impl<T, R: std::fmt::Debug> std::fmt::Debug for DefaultKeyedComponentFactory<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultKeyedComponentFactory")
            .field("resolver", &self.resolver)
            .finish()
    }
}
