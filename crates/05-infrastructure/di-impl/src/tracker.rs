//! 集合/Key 注册跟踪器
//!
//! 在一次扫描中累积集合成员和 Key 成员，检查跨指令的约束：
//!
//! - 集合中非零的 Order 必须唯一
//! - 集合中所有成员的生命周期必须与第一个成员相同
//! - 同一服务类型下的 Key 必须唯一
//!
//! 跟踪器在扫描开始时创建，由 [`RegistrationTracker::finish`] 消耗，不能跨扫描复用。

use crate::context::RegistrationContext;
use crate::keyed::DefaultKeyedComponentFactory;
use di_abstractions::KeyedComponentResolver;
use indexmap::IndexMap;
use infrastructure_common::{DependencyError, Lifetime, TrackerError, TypeRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key 比较方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyComparison {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl KeyComparison {
    /// 归一化 Key，用于唯一性检查和查找
    pub fn normalize(&self, key: &str) -> String {
        match self {
            Self::CaseSensitive => key.to_string(),
            Self::CaseInsensitive => key.to_lowercase(),
        }
    }
}

/// 集合成员
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionMember {
    /// 实际构建的类型
    pub implementation: TypeRef,
    /// 顺序，0 表示未指定
    pub order: i32,
    pub directive: RegistrationContext,
}

/// 集合注册
///
/// 解析服务类型的集合时返回所有成员，按 Order 升序排列，未指定 Order 的成员排在最后。
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionRegistration {
    service: TypeRef,
    lifetime: Lifetime,
    members: Vec<CollectionMember>,
}

impl CollectionRegistration {
    fn new(service: TypeRef, lifetime: Lifetime) -> Self {
        Self {
            service,
            lifetime,
            members: Vec::new(),
        }
    }

    /// 服务类型
    pub fn service(&self) -> &TypeRef {
        &self.service
    }

    /// 集合生命周期，由第一个成员决定
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 按注册顺序排列的成员
    pub fn members(&self) -> &[CollectionMember] {
        &self.members
    }

    /// 已使用的非零 Order
    pub fn registered_orders(&self) -> Vec<i32> {
        self.members
            .iter()
            .map(|member| member.order)
            .filter(|order| *order != 0)
            .collect()
    }

    /// 按解析顺序排列的成员
    pub fn ordered_members(&self) -> Vec<&CollectionMember> {
        let mut members: Vec<&CollectionMember> = self.members.iter().collect();
        members.sort_by_key(|member| (member.order == 0, member.order));
        members
    }

    /// 按解析顺序解析所有成员
    pub fn resolve_all<T, F>(&self, mut resolve: F) -> Result<Vec<T>, DependencyError>
    where
        F: FnMut(&CollectionMember) -> Result<T, DependencyError>,
    {
        self.ordered_members()
            .into_iter()
            .map(|member| resolve(member))
            .collect()
    }
}

/// Key 成员
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedMember {
    /// 注册时使用的原始 Key
    pub key: String,
    /// 实际构建的类型
    pub implementation: TypeRef,
    pub lifetime: Lifetime,
    pub directive: RegistrationContext,
}

/// Key 注册
///
/// 每个成员保留自己的生命周期。作为 [`KeyedComponentResolver`] 时解析到成员的实现类型。
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRegistration {
    service: TypeRef,
    comparison: KeyComparison,
    members: IndexMap<String, KeyedMember>,
}

impl KeyedRegistration {
    fn new(service: TypeRef, comparison: KeyComparison) -> Self {
        Self {
            service,
            comparison,
            members: IndexMap::new(),
        }
    }

    /// 服务类型
    pub fn service(&self) -> &TypeRef {
        &self.service
    }

    /// 按注册顺序排列的成员
    pub fn members(&self) -> impl Iterator<Item = &KeyedMember> {
        self.members.values()
    }

    /// 已注册的 Key
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.values().map(|member| member.key.as_str())
    }

    /// 查找 Key 对应的成员
    pub fn member(&self, key: &str) -> Option<&KeyedMember> {
        self.members.get(&self.comparison.normalize(key))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 转换为 Key 工厂，解析结果为实现类型
    pub fn into_factory(self) -> DefaultKeyedComponentFactory<TypeRef, Self> {
        DefaultKeyedComponentFactory::new(self)
    }

    /// 使用实例构建函数映射为实例解析器
    pub fn map_resolver<T, F>(self, build: F) -> MappedKeyedResolver<F>
    where
        F: Fn(&KeyedMember) -> Result<T, DependencyError> + Send + Sync,
    {
        MappedKeyedResolver {
            registration: self,
            build,
        }
    }
}

impl KeyedComponentResolver<TypeRef> for KeyedRegistration {
    fn resolve(&self, key: &str) -> Result<TypeRef, DependencyError> {
        self.member(key)
            .map(|member| member.implementation.clone())
            .ok_or_else(|| DependencyError::KeyNotRegistered {
                key: key.to_string(),
                service: self.service.to_string(),
            })
    }

    fn is_registered(&self, key: &str) -> bool {
        self.member(key).is_some()
    }
}

/// 将 Key 成员映射为组件实例的解析器
pub struct MappedKeyedResolver<F> {
    registration: KeyedRegistration,
    build: F,
}

impl<F> MappedKeyedResolver<F> {
    pub fn registration(&self) -> &KeyedRegistration {
        &self.registration
    }
}

impl<T, F> KeyedComponentResolver<T> for MappedKeyedResolver<F>
where
    F: Fn(&KeyedMember) -> Result<T, DependencyError> + Send + Sync,
{
    fn resolve(&self, key: &str) -> Result<T, DependencyError> {
        let member = self
            .registration
            .member(key)
            .ok_or_else(|| DependencyError::KeyNotRegistered {
                key: key.to_string(),
                service: self.registration.service.to_string(),
            })?;
        (self.build)(member)
    }

    fn is_registered(&self, key: &str) -> bool {
        self.registration.is_registered(key)
    }
}

/// 扫描结束后合并的注册结果
#[derive(Debug, Clone, Default)]
pub struct TrackedRegistrations {
    /// 普通注册（既不是集合也不带 Key）
    pub registrations: Vec<RegistrationContext>,
    pub collections: Vec<CollectionRegistration>,
    pub keyed: Vec<KeyedRegistration>,
}

/// 集合/Key 注册跟踪器
#[derive(Debug)]
pub struct RegistrationTracker {
    key_comparison: KeyComparison,
    reject_duplicate_registrations: bool,
    registrations: Vec<RegistrationContext>,
    collections: IndexMap<TypeRef, CollectionRegistration>,
    keyed: IndexMap<TypeRef, KeyedRegistration>,
}

impl RegistrationTracker {
    /// 创建新的跟踪器，默认区分 Key 大小写并拒绝重复的普通注册
    pub fn new() -> Self {
        Self {
            key_comparison: KeyComparison::default(),
            reject_duplicate_registrations: true,
            registrations: Vec::new(),
            collections: IndexMap::new(),
            keyed: IndexMap::new(),
        }
    }

    /// 设置 Key 比较方式
    pub fn with_key_comparison(mut self, key_comparison: KeyComparison) -> Self {
        self.key_comparison = key_comparison;
        self
    }

    /// 设置是否拒绝重复的普通注册
    pub fn with_reject_duplicate_registrations(mut self, reject: bool) -> Self {
        self.reject_duplicate_registrations = reject;
        self
    }

    /// 提交一条有效指令
    ///
    /// 集合成员和 Key 成员进入对应的累积状态，其余指令作为普通注册保存。
    pub fn submit(&mut self, directive: RegistrationContext) -> Result<(), TrackerError> {
        if directive.is_collection() {
            self.add_collection_member(directive)
        } else if directive.key().is_some() {
            self.add_keyed_member(directive)
        } else {
            self.add_registration(directive)
        }
    }

    /// 添加集合成员
    pub fn add_collection_member(&mut self, directive: RegistrationContext) -> Result<(), TrackerError> {
        let service = directive.from_type().clone();
        let lifetime = directive.lifetime();
        let order = directive.collection().order;

        let collection = self.collections.entry(service.clone()).or_insert_with(|| {
            debug!("创建集合注册: {} ({})", service, lifetime);
            CollectionRegistration::new(service.clone(), lifetime)
        });

        if order != 0 && collection.members.iter().any(|member| member.order == order) {
            return Err(TrackerError::DuplicateOrder {
                type_name: directive.original_to_type().to_string(),
                service: service.to_string(),
                order,
                registered_orders: collection.registered_orders(),
            });
        }

        if lifetime != collection.lifetime {
            return Err(TrackerError::MismatchedLifetime {
                type_name: directive.original_to_type().to_string(),
                service: service.to_string(),
                expected: collection.lifetime,
                actual: lifetime,
            });
        }

        debug!(
            "添加集合成员: {} -> {} (Order = {})",
            service,
            directive.construction_type(),
            order
        );
        collection.members.push(CollectionMember {
            implementation: directive.construction_type().clone(),
            order,
            directive,
        });
        Ok(())
    }

    /// 添加 Key 成员
    pub fn add_keyed_member(&mut self, directive: RegistrationContext) -> Result<(), TrackerError> {
        let service = directive.from_type().clone();
        let key = directive.key().unwrap_or_default().to_string();
        let comparison = self.key_comparison;

        let registration = self.keyed.entry(service.clone()).or_insert_with(|| {
            debug!("创建 Key 工厂: {}", service);
            KeyedRegistration::new(service.clone(), comparison)
        });

        let normalized = comparison.normalize(&key);
        if registration.members.contains_key(&normalized) {
            return Err(TrackerError::DuplicateKey {
                type_name: directive.original_to_type().to_string(),
                service: service.to_string(),
                key,
            });
        }

        debug!("添加 Key 成员: {} [{}] -> {}", service, key, directive.construction_type());
        registration.members.insert(
            normalized,
            KeyedMember {
                key,
                implementation: directive.construction_type().clone(),
                lifetime: directive.lifetime(),
                directive,
            },
        );
        Ok(())
    }

    /// 添加普通注册
    ///
    /// `ReplaceServices = true` 时替换之前对同一服务类型的注册。
    pub fn add_registration(&mut self, directive: RegistrationContext) -> Result<(), TrackerError> {
        let service = directive.from_type().clone();

        if directive.replace_services() {
            let before = self.registrations.len();
            self.registrations
                .retain(|existing| existing.from_type() != &service);
            if self.registrations.len() != before {
                debug!("替换注册: {} -> {}", service, directive.construction_type());
            }
        } else if self.reject_duplicate_registrations {
            if let Some(existing) = self
                .registrations
                .iter()
                .find(|existing| existing.from_type() == &service)
            {
                return Err(TrackerError::AlreadyRegistered {
                    type_name: directive.original_to_type().to_string(),
                    service: service.to_string(),
                    existing: existing.construction_type().to_string(),
                    attribute: directive.attribute().attribute_name().to_string(),
                });
            }
        }

        debug!("添加注册: {} -> {}", service, directive.construction_type());
        self.registrations.push(directive);
        Ok(())
    }

    /// 结束扫描，产出合并后的注册结果
    pub fn finish(self) -> TrackedRegistrations {
        debug!(
            "注册跟踪完成: {} 个普通注册, {} 个集合, {} 个 Key 工厂",
            self.registrations.len(),
            self.collections.len(),
            self.keyed.len()
        );

        TrackedRegistrations {
            registrations: self.registrations,
            collections: self.collections.into_values().collect(),
            keyed: self.keyed.into_values().collect(),
        }
    }
}

impl Default for RegistrationTracker {
    fn default() -> Self {
        Self::new()
    }
}
