//! 错误类型定义

use crate::lifecycle::Lifetime;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Key '{key}' 没有为 {service} 注册")]
    KeyNotRegistered { key: String, service: String },

    #[error("组件类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },
}

/// 组件扫描错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("组件元数据无效: {type_name}, 原因: {message}")]
    InvalidMetadata { type_name: String, message: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }

    /// 创建元数据无效错误
    pub fn invalid_metadata(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 泛型封闭错误
///
/// 只支持单个泛型参数的封闭。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法封闭泛型 {definition}: 它有 {arity} 个泛型参数，仅支持单个泛型参数")]
pub struct GenericClosingError {
    /// 待封闭的泛型类型
    pub definition: String,
    /// 泛型参数个数
    pub arity: usize,
}

/// 单条注册的校验错误
///
/// 每个变体对应一条校验规则。`type_name` 始终是被注册实现类型（泛型封闭前）的完整名称。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{type_name}: 不能同时指定 Concrete 和 For 参数。")]
    ConcreteWithExplicitFor { type_name: String },

    #[error("{}", ambiguous_message(.type_name, .attribute, .implementation, .candidates))]
    AmbiguousBaseType {
        type_name: String,
        /// 注册属性名称，例如 `RegisterSingleton`
        attribute: String,
        /// 实现类型的简短名称
        implementation: String,
        /// 所有候选基类型的简短名称
        candidates: Vec<String>,
    },

    #[error("{type_name}: 泛型工厂必须指定泛型实参，例如 GenericArgument = GenericArgumentType。")]
    MissingGenericArgument { type_name: String },

    #[error("{type_name}: GenericArgument 本身不能是泛型类型，但指定了 {argument}。")]
    GenericArgumentIsGeneric { type_name: String, argument: String },

    #[error("{type_name}: 不支持多于 1 个泛型参数的泛型注册（{generic_type} 有 {arity} 个泛型参数）。")]
    MultipleGenericParameters {
        type_name: String,
        generic_type: String,
        arity: usize,
    },

    #[error("{type_name}: 具体类型注册不能声明 Mock（{mock}）。")]
    ConcreteWithMock { type_name: String, mock: String },

    #[error("{type_name}: 指定的 Mock {mock} 不兼容，因为它没有实现注册的类型:\n{service}")]
    IncompatibleMock {
        type_name: String,
        mock: String,
        service: String,
    },

    #[error("{type_name}: 显式注册了 For = {service}，但该类型并未实现它。")]
    ExplicitTypeNotImplemented { type_name: String, service: String },

    #[error("{type_name}: Key、Factory 和 OfCollection = true 只能指定其中之一。")]
    OverlyComplexRegistration { type_name: String },

    #[error("{type_name}: Factory 必须实现 {required}，但实际指定的是 {factory}。")]
    InvalidFactory {
        type_name: String,
        required: String,
        factory: String,
    },

    #[error("{type_name}: 只有在 OfCollection = true 时才能指定 Order（当前 Order = {order}）。")]
    OrderWithoutCollection { type_name: String, order: i32 },

    #[error("{type_name}: 被拦截的组件必须注册为接口，但指定的是 {service}。")]
    InterceptedNotInterface { type_name: String, service: String },

    #[error("{type_name}: 具体类型注册不能被拦截，必须注册为接口。")]
    InterceptedConcrete { type_name: String },

    #[error("{type_name}: 基于属性的注册暂不支持拦截泛型类型。")]
    InterceptedGeneric { type_name: String },

    #[error("{type_name}: Mock 必须是具体类型，但指定了抽象类或接口: {mock}")]
    AbstractMock { type_name: String, mock: String },

    #[error("{type_name}: Mock {mock} 不应派生自真实实现，而应实现相同的接口。如需在 Mock 和真实实现之间共享功能，请创建一个抽象基类。")]
    MockDerivesFromLive { type_name: String, mock: String },

    #[error("{type_name}: 注册是递归的。如需注册具体类型请使用 Concrete = true；或者您是想指定一个接口？")]
    RecursiveRegistration { type_name: String },
}

impl ValidationError {
    /// 出错的实现类型完整名称
    pub fn type_name(&self) -> &str {
        match self {
            Self::ConcreteWithExplicitFor { type_name }
            | Self::AmbiguousBaseType { type_name, .. }
            | Self::MissingGenericArgument { type_name }
            | Self::GenericArgumentIsGeneric { type_name, .. }
            | Self::MultipleGenericParameters { type_name, .. }
            | Self::ConcreteWithMock { type_name, .. }
            | Self::IncompatibleMock { type_name, .. }
            | Self::ExplicitTypeNotImplemented { type_name, .. }
            | Self::OverlyComplexRegistration { type_name }
            | Self::InvalidFactory { type_name, .. }
            | Self::OrderWithoutCollection { type_name, .. }
            | Self::InterceptedNotInterface { type_name, .. }
            | Self::InterceptedConcrete { type_name }
            | Self::InterceptedGeneric { type_name }
            | Self::AbstractMock { type_name, .. }
            | Self::MockDerivesFromLive { type_name, .. }
            | Self::RecursiveRegistration { type_name } => type_name,
        }
    }
}

fn ambiguous_message(
    type_name: &str,
    attribute: &str,
    implementation: &str,
    candidates: &[String],
) -> String {
    let options: String = candidates
        .iter()
        .map(|candidate| format!("\n - For = {}", candidate))
        .collect();
    let attributes: String = candidates
        .iter()
        .map(|candidate| format!("#[{}(For = {})]\n", attribute, candidate))
        .collect();

    format!(
        "{}: 注册存在歧义，实现类型有多个基类型，且无法确定唯一的接口。请在注册属性中添加以下之一:\n{}\n\n\
         或者，如需将多个基类型解析到同一个实现，请使用多个注册属性修饰该类型，例如:\n\n{}pub struct {} ...",
        type_name, options, attributes, implementation
    )
}

/// 跨注册冲突错误
///
/// 由集合/Key 注册跟踪器在累积多条注册时检测。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error(
        "{type_name}: 集合 {service} 中已经注册了 Order = {order} 的条目。集合的 Order 必须未指定、为 0 或者唯一。\
         之前已注册的 Order: {{ {} }}。",
        join_orders(.registered_orders)
    )]
    DuplicateOrder {
        type_name: String,
        service: String,
        order: i32,
        registered_orders: Vec<i32>,
    },

    #[error(
        "{type_name}: 以无效的生命周期 {actual} 注册到集合 {service}。集合中的所有条目必须使用相同的生命周期，\
         生命周期在第一个条目注册时确定，此处为 {expected}。"
    )]
    MismatchedLifetime {
        type_name: String,
        service: String,
        expected: Lifetime,
        actual: Lifetime,
    },

    #[error("{type_name}: Key \"{key}\" 已经为 {service} 注册过。Key 必须唯一。")]
    DuplicateKey {
        type_name: String,
        service: String,
        key: String,
    },

    #[error(
        "{type_name}: 服务类型 {service} 已经注册为 {existing}，注册不能被覆盖。\n\
         如需注册一组一起解析的组件，请使用 #[{attribute}(OfCollection = true)]。\n\
         如需按 Key 单独解析同一类型的多个实现，请使用 #[{attribute}(Key = \"MyKey\")]。\n\
         如需替换之前的注册，请使用 #[{attribute}(ReplaceServices = true)]。"
    )]
    AlreadyRegistered {
        type_name: String,
        service: String,
        existing: String,
        attribute: String,
    },
}

fn join_orders(orders: &[i32]) -> String {
    orders
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
