//! 注册属性定义
//!
//! 一个类型可以被多个注册属性修饰，每个属性实例产生一条独立的注册指令。

use infrastructure_common::{Lifetime, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 注册属性种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    Singleton,
    /// 按请求注册，等同于 [`RegistrationKind::Scoped`]
    PerRequest,
    Scoped,
    Transient,
    HostedService,
}

impl RegistrationKind {
    /// 对应的组件生命周期
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Self::Singleton => Lifetime::Singleton,
            Self::PerRequest | Self::Scoped => Lifetime::Scoped,
            Self::Transient => Lifetime::Transient,
            Self::HostedService => Lifetime::HostedService,
        }
    }

    /// 属性名称，用于错误信息中的修正建议
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::Singleton => "RegisterSingleton",
            Self::PerRequest => "RegisterPerRequest",
            Self::Scoped => "RegisterScoped",
            Self::Transient => "RegisterTransient",
            Self::HostedService => "RegisterHostedService",
        }
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// 注册属性
///
/// 描述一个实现类型应当如何注册。除 `kind` 外所有字段都是可选的。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAttribute {
    /// 属性种类（决定生命周期）
    pub kind: RegistrationKind,
    /// 显式指定注册的服务类型 (`For`)
    #[serde(default, rename = "for")]
    pub for_type: Option<TypeRef>,
    /// Mock 模式下替换真实实现的类型
    #[serde(default)]
    pub mock: Option<TypeRef>,
    /// 注册为具体类型本身
    #[serde(default)]
    pub concrete: bool,
    /// 作为集合成员注册
    #[serde(default)]
    pub of_collection: bool,
    /// 集合中的顺序，0 表示未指定
    #[serde(default)]
    pub order: i32,
    /// 按 Key 注册
    #[serde(default)]
    pub key: Option<String>,
    /// 构建组件的工厂类型
    #[serde(default)]
    pub factory: Option<TypeRef>,
    /// 封闭泛型时使用的泛型实参
    #[serde(default)]
    pub generic_argument: Option<TypeRef>,
    /// 替换之前对同一服务类型的注册
    #[serde(default)]
    pub replace_services: bool,
}

impl RegistrationAttribute {
    /// 创建新的注册属性
    pub fn new(kind: RegistrationKind) -> Self {
        Self {
            kind,
            for_type: None,
            mock: None,
            concrete: false,
            of_collection: false,
            order: 0,
            key: None,
            factory: None,
            generic_argument: None,
            replace_services: false,
        }
    }

    pub fn singleton() -> Self {
        Self::new(RegistrationKind::Singleton)
    }

    pub fn per_request() -> Self {
        Self::new(RegistrationKind::PerRequest)
    }

    pub fn scoped() -> Self {
        Self::new(RegistrationKind::Scoped)
    }

    pub fn transient() -> Self {
        Self::new(RegistrationKind::Transient)
    }

    pub fn hosted_service() -> Self {
        Self::new(RegistrationKind::HostedService)
    }

    /// 设置 `For`
    pub fn with_for(mut self, service: TypeRef) -> Self {
        self.for_type = Some(service);
        self
    }

    /// 设置 `Mock`
    pub fn with_mock(mut self, mock: TypeRef) -> Self {
        self.mock = Some(mock);
        self
    }

    /// 设置 `Concrete = true`
    pub fn as_concrete(mut self) -> Self {
        self.concrete = true;
        self
    }

    /// 设置 `OfCollection = true`
    pub fn in_collection(mut self) -> Self {
        self.of_collection = true;
        self
    }

    /// 设置 `Order`
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// 设置 `Key`
    ///
    /// Key 可以是任意可显示的值（字符串、枚举等），统一转换为字符串保存。
    pub fn with_key(mut self, key: impl fmt::Display) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// 设置 `Factory`
    pub fn with_factory(mut self, factory: TypeRef) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 设置 `GenericArgument`
    pub fn with_generic_argument(mut self, argument: TypeRef) -> Self {
        self.generic_argument = Some(argument);
        self
    }

    /// 设置 `ReplaceServices = true`
    pub fn replacing_services(mut self) -> Self {
        self.replace_services = true;
        self
    }

    /// 组件生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.kind.lifetime()
    }

    /// 属性名称
    pub fn attribute_name(&self) -> &'static str {
        self.kind.attribute_name()
    }
}
