//! 注册选项
//!
//! 选项按以下顺序分层加载，后面的来源覆盖前面的：
//!
//! 1. 可选的配置文件 `config/registration`（toml/json/yaml）
//! 2. 以 `AUTOWIRE` 为前缀、`__` 为分隔符的环境变量，例如 `AUTOWIRE__MOCK_MODE=true`

use di_impl::{KeyComparison, DEFAULT_EXCLUDED_NAMESPACE_PREFIXES};
use infrastructure_common::{ConfigError, ConfigSection, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error};

/// 默认的配置文件（不含扩展名）
pub const DEFAULT_OPTIONS_FILE: &str = "config/registration";

/// 默认的环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "AUTOWIRE";

/// 失败处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// 扫描结束后存在任何失败都返回聚合错误
    #[default]
    Strict,
    /// 失败交给调用方的回调，继续使用有效的注册
    Lenient,
}

/// 注册选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationOptions {
    /// 以 Mock 模式构建注册指令
    pub mock_mode: bool,
    /// 不作为候选基类型的命名空间前缀
    pub excluded_namespace_prefixes: Vec<String>,
    /// 失败处理策略
    pub error_policy: ErrorPolicy,
    /// Key 比较方式
    pub key_comparison: KeyComparison,
    /// 拒绝同一服务类型的重复普通注册
    pub reject_duplicate_registrations: bool,
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self {
            mock_mode: false,
            excluded_namespace_prefixes: DEFAULT_EXCLUDED_NAMESPACE_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            error_policy: ErrorPolicy::default(),
            key_comparison: KeyComparison::default(),
            reject_duplicate_registrations: true,
        }
    }
}

impl RegistrationOptions {
    /// 从默认位置加载选项
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_OPTIONS_FILE), DEFAULT_ENV_PREFIX)
    }

    /// 从指定文件和环境变量前缀加载选项
    ///
    /// 文件不存在时忽略。
    pub fn load_from(path: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        debug!("加载注册选项: {} (环境变量前缀 {})", path.display(), env_prefix);

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("excluded_namespace_prefixes"),
            )
            .build()
            .map_err(|e| {
                error!("注册选项构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let data: HashMap<String, serde_json::Value> =
            settings.try_deserialize().map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        Self::from_section(&ConfigSection { data })
    }

    /// 从配置节绑定选项并校验
    pub fn from_section(section: &ConfigSection) -> Result<Self, ConfigError> {
        let options: Self = section.bind()?;
        RegistrationOptionsValidator.validate(&options)?;
        Ok(options)
    }

    /// 设置 Mock 模式
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// 设置失败处理策略
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// 设置 Key 比较方式
    pub fn with_key_comparison(mut self, key_comparison: KeyComparison) -> Self {
        self.key_comparison = key_comparison;
        self
    }
}

/// 注册选项校验器
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistrationOptionsValidator;

impl ConfigValidator<RegistrationOptions> for RegistrationOptionsValidator {
    fn validate(&self, config: &RegistrationOptions) -> Result<(), ConfigError> {
        if let Some(prefix) = config
            .excluded_namespace_prefixes
            .iter()
            .find(|prefix| prefix.trim().is_empty() || prefix.ends_with("::"))
        {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "excluded_namespace_prefixes 中的前缀无效: '{}'，前缀不能为空且不能以 '::' 结尾",
                    prefix
                ),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RegistrationOptionsValidator"
    }
}
