//! 校验错误聚合

use crate::context::RegistrationContext;
use infrastructure_common::{TrackerError, ValidationError};
use thiserror::Error;

/// 错误信息之间的分隔线
pub const FAILURE_DIVIDER: &str =
    "\n\n--------------------------------------------------------------\n\n";

/// 单条注册错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// 注册失败记录：出错的指令及其错误
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationFailure {
    pub directive: RegistrationContext,
    pub error: RegistrationError,
}

impl RegistrationFailure {
    pub fn new(directive: RegistrationContext, error: impl Into<RegistrationError>) -> Self {
        Self {
            directive,
            error: error.into(),
        }
    }

    /// 用户可见的错误信息
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// 收集所有无效指令的错误
pub fn aggregate<'a, I>(directives: I) -> Vec<RegistrationFailure>
where
    I: IntoIterator<Item = &'a RegistrationContext>,
{
    directives
        .into_iter()
        .filter_map(|directive| {
            directive
                .error()
                .map(|error| RegistrationFailure::new(directive.clone(), error.clone()))
        })
        .collect()
}

/// 注册失败错误
///
/// 信息为所有单条错误信息的拼接，多于一条时以错误数量开头。
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RegistrationFailedError {
    message: String,
    failures: Vec<RegistrationFailure>,
}

impl RegistrationFailedError {
    /// 由失败记录创建错误，没有失败记录时返回 `None`
    pub fn from_failures(failures: Vec<RegistrationFailure>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }

        let mut messages: Vec<String> = failures.iter().map(RegistrationFailure::message).collect();
        if messages.len() > 1 {
            messages.insert(0, format!("注册组件时共遇到 {} 个错误。", messages.len()));
        }

        Some(Self {
            message: format!("{}\n", messages.join(FAILURE_DIVIDER)),
            failures,
        })
    }

    /// 单条失败记录
    pub fn failures(&self) -> &[RegistrationFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<RegistrationFailure> {
        self.failures
    }
}

/// 存在失败记录时返回聚合错误
pub fn ensure_no_failures(failures: Vec<RegistrationFailure>) -> Result<(), RegistrationFailedError> {
    match RegistrationFailedError::from_failures(failures) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
