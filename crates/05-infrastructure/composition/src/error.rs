//! 组合层错误类型

use di_impl::RegistrationFailedError;
use infrastructure_common::{ComponentError, ConfigError};
use thiserror::Error;

/// 组合层错误
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("注册选项加载失败: {0}")]
    Config(#[from] ConfigError),

    #[error("候选类型扫描失败: {0}")]
    Scan(#[from] ComponentError),

    #[error(transparent)]
    Registration(#[from] RegistrationFailedError),

    #[error("日志初始化失败: {message}")]
    Logging { message: String },
}
