//! 注册清单
//!
//! 构建期生成（或手写）的 JSON 清单，同时提供类型元数据和候选类型。

use di_abstractions::{CandidateClass, CandidateSource};
use di_impl::InMemoryTypeCatalog;
use infrastructure_common::{ComponentError, TypeDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 注册清单
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationManifest {
    /// 清单名称
    #[serde(default)]
    pub name: String,
    /// 类型定义
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    /// 候选类型，顺序即提交顺序
    #[serde(default)]
    pub candidates: Vec<CandidateClass>,
}

impl RegistrationManifest {
    /// 解析 JSON 清单
    pub fn from_json_str(json: &str) -> Result<Self, ComponentError> {
        serde_json::from_str(json)
            .map_err(|e| ComponentError::scan_error(format!("注册清单解析失败: {}", e)))
    }

    /// 从文件加载 JSON 清单
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ComponentError> {
        let path = path.as_ref();
        debug!("加载注册清单: {}", path.display());

        let json = std::fs::read_to_string(path).map_err(|e| {
            ComponentError::scan_error(format!("注册清单读取失败: {}: {}", path.display(), e))
        })?;
        let mut manifest = Self::from_json_str(&json)?;
        if manifest.name.is_empty() {
            manifest.name = path.display().to_string();
        }

        info!(
            "注册清单加载完成: {} ({} 个类型, {} 个候选类型)",
            manifest.name,
            manifest.types.len(),
            manifest.candidates.len()
        );
        Ok(manifest)
    }

    /// 由清单中的类型定义构建类型目录
    pub fn catalog(&self) -> InMemoryTypeCatalog {
        self.types.iter().cloned().collect()
    }
}

impl CandidateSource for RegistrationManifest {
    fn scan(&self) -> Result<Vec<CandidateClass>, ComponentError> {
        for candidate in &self.candidates {
            if candidate.ty.is_generic_parameter() {
                return Err(ComponentError::invalid_metadata(
                    candidate.ty.to_string(),
                    "候选类型不能是泛型形参",
                ));
            }
        }
        Ok(self.candidates.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
