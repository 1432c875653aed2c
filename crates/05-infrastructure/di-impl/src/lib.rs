//! # 注册解析与校验引擎
//!
//! 将 (候选类型, 注册属性) 对转换为无副作用的注册指令，或者聚合的校验错误。
//!
//! ## 处理流程
//!
//! 1. [`DirectiveBuilder`] 借助 [`TypeHierarchy`] 和 [`close_generic`] 为每个属性实例构建
//!    [`RegistrationContext`]，并按固定顺序执行校验规则
//! 2. 无效指令通过 [`aggregate`] 收集为 [`RegistrationFailure`]
//! 3. 有效指令提交给 [`RegistrationTracker`]，由它检查集合顺序、集合生命周期和 Key 的唯一性
//! 4. 扫描结束后 [`RegistrationTracker::finish`] 产出合并后的集合注册和 Key 注册

pub mod catalog;
pub mod context;
pub mod factory;
pub mod generics;
pub mod hierarchy;
pub mod interceptor;
pub mod keyed;
pub mod tracker;
pub mod validation;

pub use catalog::*;
pub use context::*;
pub use factory::*;
pub use generics::*;
pub use hierarchy::*;
pub use interceptor::*;
pub use keyed::*;
pub use tracker::*;
pub use validation::*;
