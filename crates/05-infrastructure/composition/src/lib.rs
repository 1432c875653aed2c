//! # 基础设施组合层
//!
//! 将注册引擎与配置、日志以及候选类型来源组合起来，对外提供一次完整的注册扫描。
//!
//! ## 主要功能
//!
//! - **注册选项**: 从配置文件和环境变量分层加载 [`RegistrationOptions`]
//! - **注册清单**: 从 JSON 清单加载类型元数据和候选类型
//! - **注册扫描**: 按失败处理策略产出 [`RegistrationPlan`]
//! - **日志初始化**: 基于 `tracing-subscriber` 的全局日志配置
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{
//!     initialize_logging, LoggingConfig, RegistrationManifest, RegistrationOptions,
//!     RegistrationScanner,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     initialize_logging(&LoggingConfig::development())?;
//!
//!     let manifest = RegistrationManifest::load("registration.json")?;
//!     let scanner = RegistrationScanner::new(Arc::new(manifest.catalog()), RegistrationOptions::load()?);
//!     let plan = scanner.scan(&manifest)?;
//!
//!     for registration in &plan.registrations {
//!         println!("{} => {}", registration.from_type(), registration.construction_type());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod manifest;
pub mod options;
pub mod scanner;

pub use error::*;
pub use logging::*;
pub use manifest::*;
pub use options::*;
pub use scanner::*;
