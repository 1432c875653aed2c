//! 注册扫描
//!
//! 一次扫描依次完成以下步骤：
//!
//! 1. 从 [`CandidateSource`] 获取带注册属性的候选类型
//! 2. 为每个（类型, 属性）构建并校验注册指令
//! 3. 将有效指令提交给本次扫描独有的 [`RegistrationTracker`]
//! 4. 按 [`ErrorPolicy`] 处理收集到的失败

use crate::error::CompositionError;
use crate::options::{ErrorPolicy, RegistrationOptions};
use di_abstractions::{CandidateClass, CandidateSource, TypeCatalog};
use di_impl::{
    CollectionRegistration, DirectiveBuilder, InterceptorMatcher, KeyedRegistration,
    RegistrationContext, RegistrationFailedError, RegistrationFailure, RegistrationTracker,
    TypeHierarchy,
};
use infrastructure_common::TypeRef;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次扫描的结果
#[derive(Debug, Clone, Default)]
pub struct RegistrationPlan {
    /// 普通注册，按提交顺序排列
    pub registrations: Vec<RegistrationContext>,
    /// 集合注册
    pub collections: Vec<CollectionRegistration>,
    /// Key 注册
    pub keyed: Vec<KeyedRegistration>,
    /// 宽松策略下交给回调的失败数量
    pub failure_count: usize,
}

impl RegistrationPlan {
    /// 获取服务类型的普通注册
    pub fn registration(&self, service: &TypeRef) -> Option<&RegistrationContext> {
        self.registrations
            .iter()
            .find(|registration| registration.from_type() == service)
    }

    /// 获取服务类型的集合注册
    pub fn collection(&self, service: &TypeRef) -> Option<&CollectionRegistration> {
        self.collections
            .iter()
            .find(|collection| collection.service() == service)
    }

    /// 获取服务类型的 Key 注册
    pub fn keyed_registration(&self, service: &TypeRef) -> Option<&KeyedRegistration> {
        self.keyed.iter().find(|keyed| keyed.service() == service)
    }

    /// 有效注册的总数
    pub fn len(&self) -> usize {
        self.registrations.len()
            + self
                .collections
                .iter()
                .map(|collection| collection.members().len())
                .sum::<usize>()
            + self.keyed.iter().map(KeyedRegistration::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 注册扫描器
#[derive(Debug, Clone)]
pub struct RegistrationScanner {
    builder: DirectiveBuilder,
    options: RegistrationOptions,
}

impl RegistrationScanner {
    /// 创建扫描器
    pub fn new(catalog: Arc<dyn TypeCatalog>, options: RegistrationOptions) -> Self {
        let hierarchy = TypeHierarchy::new(catalog)
            .with_excluded_namespace_prefixes(options.excluded_namespace_prefixes.iter().cloned());
        let builder = DirectiveBuilder::new(hierarchy).with_mock_mode(options.mock_mode);
        Self { builder, options }
    }

    /// 设置拦截器匹配器
    pub fn with_interceptors(mut self, interceptors: Arc<dyn InterceptorMatcher>) -> Self {
        self.builder = self.builder.with_interceptors(interceptors);
        self
    }

    pub fn options(&self) -> &RegistrationOptions {
        &self.options
    }

    pub fn builder(&self) -> &DirectiveBuilder {
        &self.builder
    }

    /// 扫描候选类型来源
    ///
    /// 宽松策略下失败只记录警告日志；需要逐条处理失败时使用 [`Self::scan_lenient`]。
    pub fn scan(&self, source: &dyn CandidateSource) -> Result<RegistrationPlan, CompositionError> {
        info!("开始扫描注册来源: {}", source.name());
        let candidates = source.scan()?;

        let plan = match self.options.error_policy {
            ErrorPolicy::Strict => self.scan_strict(&candidates)?,
            ErrorPolicy::Lenient => self.scan_lenient(&candidates, |_| {}),
        };
        Ok(plan)
    }

    /// 严格扫描：存在任何失败时返回聚合错误
    pub fn scan_strict(
        &self,
        candidates: &[CandidateClass],
    ) -> Result<RegistrationPlan, RegistrationFailedError> {
        let mut failures = Vec::new();
        let plan = self.run(candidates, |failure| failures.push(failure));

        match RegistrationFailedError::from_failures(failures) {
            Some(error) => Err(error),
            None => Ok(plan),
        }
    }

    /// 宽松扫描：失败交给回调，有效注册照常返回
    pub fn scan_lenient<F>(&self, candidates: &[CandidateClass], sink: F) -> RegistrationPlan
    where
        F: FnMut(RegistrationFailure),
    {
        self.run(candidates, sink)
    }

    fn run<F>(&self, candidates: &[CandidateClass], mut sink: F) -> RegistrationPlan
    where
        F: FnMut(RegistrationFailure),
    {
        let mut tracker = RegistrationTracker::new()
            .with_key_comparison(self.options.key_comparison)
            .with_reject_duplicate_registrations(self.options.reject_duplicate_registrations);
        let mut failure_count = 0;
        let mut report = |failure: RegistrationFailure| {
            warn!("注册失败: {}", failure.message());
            failure_count += 1;
            sink(failure);
        };

        for candidate in candidates.iter().filter(|candidate| candidate.is_registrable()) {
            debug!(
                "处理候选类型: {} ({} 个注册属性)",
                candidate.ty,
                candidate.attributes.len()
            );
            for attribute in &candidate.attributes {
                let directive = self.builder.build(attribute, &candidate.ty);
                if let Some(error) = directive.error().cloned() {
                    report(RegistrationFailure::new(directive, error));
                    continue;
                }

                if let Err(error) = tracker.submit(directive.clone()) {
                    report(RegistrationFailure::new(directive, error));
                }
            }
        }

        let tracked = tracker.finish();
        let plan = RegistrationPlan {
            registrations: tracked.registrations,
            collections: tracked.collections,
            keyed: tracked.keyed,
            failure_count,
        };

        info!(
            "注册扫描完成: {} 个有效注册, {} 个失败",
            plan.len(),
            plan.failure_count
        );
        plan
    }
}
