//! 组件生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 首次解析时创建，整个应用生命周期内复用
    Singleton,
    /// 作用域模式 - 在同一作用域（例如同一个 HTTP 请求）内共享实例
    Scoped,
    /// 瞬时模式 - 每次解析都创建新实例
    Transient,
    /// 托管服务 - 由宿主启动和停止的后台服务
    HostedService,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Transient
    }
}

impl Lifetime {
    /// 生命周期名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Scoped => "Scoped",
            Self::Transient => "Transient",
            Self::HostedService => "HostedService",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
