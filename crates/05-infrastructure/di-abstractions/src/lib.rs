//! # Dependency Injection Abstractions
//!
//! 基于属性的自动注册抽象层，定义注册属性、候选类型来源和工厂契约。
//!
//! ## 核心接口
//!
//! - [`RegistrationAttribute`] - 注册属性（生命周期种类 + 注册选项）
//! - [`CandidateSource`] - 候选类型来源（由外部扫描器实现）
//! - [`TypeCatalog`] - 类型元数据目录
//! - [`ComponentFactory`] - 组件工厂构建契约
//! - [`KeyedComponentFactory`] - 按 Key 解析组件的工厂

pub mod attribute;
pub mod catalog;
pub mod factory;
pub mod resolver;
pub mod scanner;

pub use attribute::*;
pub use catalog::*;
pub use factory::*;
pub use resolver::*;
pub use scanner::*;
