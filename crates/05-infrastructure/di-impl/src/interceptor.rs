//! 拦截器链
//!
//! 按注册顺序对满足条件的组件实例进行包装（代理/装饰）。

use crate::context::RegistrationContext;
use di_abstractions::RegistrationAttribute;
use infrastructure_common::TypeRef;
use tracing::debug;

/// 拦截器匹配 trait
///
/// 指令构建时只需要知道某个注册是否会被拦截，不关心实例类型。
pub trait InterceptorMatcher: Send + Sync {
    /// 是否有拦截器适用于该注册
    fn has_interceptors(&self, attribute: &RegistrationAttribute, implementation: &TypeRef) -> bool;
}

type ProxyFn<I> = Box<dyn Fn(&TypeRef, I) -> I + Send + Sync>;
type ShouldApplyFn = Box<dyn Fn(&RegistrationAttribute, &TypeRef) -> bool + Send + Sync>;

struct Interceptor<I> {
    proxy: ProxyFn<I>,
    should_apply: ShouldApplyFn,
}

/// 拦截器链
pub struct InterceptorChain<I> {
    interceptors: Vec<Interceptor<I>>,
}

impl<I> InterceptorChain<I> {
    /// 创建空的拦截器链
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// 注册拦截器
    ///
    /// `proxy` 接收注册的服务类型和待包装的实例；拦截器按注册顺序应用。
    pub fn register_interceptor<P, S>(&mut self, proxy: P, should_apply: S)
    where
        P: Fn(&TypeRef, I) -> I + Send + Sync + 'static,
        S: Fn(&RegistrationAttribute, &TypeRef) -> bool + Send + Sync + 'static,
    {
        self.interceptors.push(Interceptor {
            proxy: Box::new(proxy),
            should_apply: Box::new(should_apply),
        });
    }

    /// 已注册的拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 用所有适用的拦截器包装实例
    pub fn wrap(&self, instance: I, directive: &RegistrationContext) -> I {
        if !directive.is_intercepted() {
            return instance;
        }

        let service = directive.from_type();
        self.interceptors
            .iter()
            .filter(|interceptor| {
                (interceptor.should_apply)(directive.attribute(), directive.original_to_type())
            })
            .fold(instance, |wrapped, interceptor| {
                debug!("应用拦截器: {}", service);
                (interceptor.proxy)(service, wrapped)
            })
    }
}

impl<I> Default for InterceptorChain<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> InterceptorMatcher for InterceptorChain<I> {
    fn has_interceptors(&self, attribute: &RegistrationAttribute, implementation: &TypeRef) -> bool {
        self.interceptors
            .iter()
            .any(|interceptor| (interceptor.should_apply)(attribute, implementation))
    }
}

impl<I> std::fmt::Debug for InterceptorChain<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
