//! 候选类型来源抽象接口
//!
//! 属性发现由外部协作者完成（构建期生成的注册表、宏或手写静态表），
//! 注册核心只消费这里定义的 [`CandidateClass`] 形状。

use crate::attribute::RegistrationAttribute;
use infrastructure_common::{ComponentError, TypeRef};
use serde::{Deserialize, Serialize};

/// 候选类型
///
/// 一个带有注册属性的实现类型。类型的接口和基类信息由 [`crate::TypeCatalog`] 提供。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateClass {
    /// 实现类型
    pub ty: TypeRef,
    /// 修饰该类型的注册属性
    #[serde(default)]
    pub attributes: Vec<RegistrationAttribute>,
}

impl CandidateClass {
    /// 创建新的候选类型
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            attributes: Vec::new(),
        }
    }

    /// 添加注册属性
    pub fn with_attribute(mut self, attribute: RegistrationAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// 是否带有注册属性
    pub fn is_registrable(&self) -> bool {
        !self.attributes.is_empty()
    }
}

/// 候选类型来源 trait
///
/// 每次扫描返回的顺序即为提交顺序，实现必须保证顺序稳定。
pub trait CandidateSource: Send + Sync {
    /// 扫描候选类型
    fn scan(&self) -> Result<Vec<CandidateClass>, ComponentError>;

    /// 获取来源名称
    fn name(&self) -> &str;
}

/// 静态候选类型来源
///
/// 由手写或生成的静态表构建。
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    name: String,
    candidates: Vec<CandidateClass>,
}

impl StaticCandidateSource {
    /// 创建新的静态来源
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    /// 添加候选类型
    pub fn with_candidate(mut self, candidate: CandidateClass) -> Self {
        self.candidates.push(candidate);
        self
    }
}

impl CandidateSource for StaticCandidateSource {
    fn scan(&self) -> Result<Vec<CandidateClass>, ComponentError> {
        Ok(self.candidates.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
