//! # Infrastructure Common
//!
//! 这个 crate 提供了基于属性的组件自动注册层的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`TypeRef`] - 类型引用（支持开放/封闭泛型）
//! - [`TypeDefinition`] - 类型定义元数据（接口、基类、类型种类）
//! - [`Lifetime`] - 组件生命周期
//! - [`ConfigSection`] - 配置节绑定
//! - 错误类型：[`ValidationError`]、[`TrackerError`]、[`GenericClosingError`] 等
//!
//! ## 设计原则
//!
//! - 元数据由外部扫描器提供，核心只依赖抽象的类型形状
//! - 注册校验错误作为数据记录，而不是立即抛出
//! - 所有用户可见的错误都包含完整类型名和可执行的修正建议

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
