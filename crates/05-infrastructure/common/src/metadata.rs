//! 元数据定义
//!
//! 提供类型引用和类型定义的元数据信息。类型元数据由外部扫描器（构建期生成的
//! 注册表、宏或手写的静态表）提供，注册核心只依赖这里定义的抽象形状。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 命名空间分隔符
pub const NAMESPACE_SEPARATOR: &str = "::";

/// 类型引用
///
/// 既可以是一个具名类型（可能带有泛型实参），也可以是一个泛型形参。
///
/// - `app::Service` - 非泛型类型
/// - `app::Repository<T>` - 开放泛型定义（所有实参都是形参）
/// - `app::Repository<app::User>` - 封闭泛型
/// - `app::Wrapper<app::Inner<T>>` - 多层嵌套的开放泛型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// 具名类型
    Named {
        /// 完整路径，例如 `app::services::UserService`
        path: String,
        /// 泛型实参
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
    /// 泛型形参，例如 `T`
    Param(String),
}

impl TypeRef {
    /// 创建非泛型具名类型
    pub fn named(path: impl Into<String>) -> Self {
        Self::Named {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// 创建泛型类型
    pub fn generic(path: impl Into<String>, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Named {
            path: path.into(),
            args: args.into_iter().collect(),
        }
    }

    /// 创建泛型形参
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// 完整名称（不含泛型实参）
    pub fn full_name(&self) -> &str {
        match self {
            Self::Named { path, .. } => path,
            Self::Param(name) => name,
        }
    }

    /// 简短名称（不包含命名空间）
    pub fn short_name(&self) -> &str {
        let name = self.full_name();
        name.rsplit_once(NAMESPACE_SEPARATOR)
            .map_or(name, |(_, short)| short)
    }

    /// 所属命名空间，泛型形参和顶层类型没有命名空间
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Named { path, .. } => path.rsplit_once(NAMESPACE_SEPARATOR).map(|(ns, _)| ns),
            Self::Param(_) => None,
        }
    }

    /// 泛型实参列表
    pub fn generic_arguments(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            Self::Param(_) => &[],
        }
    }

    /// 泛型参数个数
    pub fn arity(&self) -> usize {
        self.generic_arguments().len()
    }

    /// 是否为泛型类型（开放或封闭）
    pub fn is_generic(&self) -> bool {
        self.arity() > 0
    }

    /// 是否为泛型形参
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// 是否（在任意嵌套层级上）包含未绑定的泛型形参
    pub fn contains_generic_parameters(&self) -> bool {
        match self {
            Self::Param(_) => true,
            Self::Named { args, .. } => args.iter().any(Self::contains_generic_parameters),
        }
    }

    /// 是否为开放泛型定义，即所有实参都是形参
    pub fn is_generic_type_definition(&self) -> bool {
        match self {
            Self::Named { args, .. } => !args.is_empty() && args.iter().all(Self::is_generic_parameter),
            Self::Param(_) => false,
        }
    }

    /// 获取泛型定义
    ///
    /// 实参被替换为形参；单参数泛型使用 `T`，多参数泛型使用 `T1..Tn`。
    /// 非泛型类型原样返回。
    pub fn definition(&self) -> Self {
        match self {
            Self::Named { path, args } if !args.is_empty() => {
                let params = if args.len() == 1 {
                    vec![Self::param("T")]
                } else {
                    (1..=args.len()).map(|i| Self::param(format!("T{}", i))).collect()
                };
                Self::generic(path.clone(), params)
            }
            other => other.clone(),
        }
    }

    /// 是否与另一个类型具有相同的泛型定义（名称和参数个数相同）
    pub fn same_definition(&self, other: &TypeRef) -> bool {
        match (self, other) {
            (Self::Named { path: a, args: x }, Self::Named { path: b, args: y }) => {
                a == b && x.len() == y.len()
            }
            _ => false,
        }
    }

    /// 使用新的实参替换当前实参
    pub fn with_arguments(&self, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::generic(self.full_name().to_string(), args)
    }

    /// 按照形参映射进行替换
    pub fn substitute(&self, substitutions: &HashMap<String, TypeRef>) -> Self {
        match self {
            Self::Param(name) => substitutions
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Named { path, args } => Self::Named {
                path: path.clone(),
                args: args.iter().map(|arg| arg.substitute(substitutions)).collect(),
            },
        }
    }

    /// 简短的显示名称，泛型实参同样使用简短名称
    pub fn display_name(&self) -> String {
        match self {
            Self::Param(name) => name.clone(),
            Self::Named { args, .. } if args.is_empty() => self.short_name().to_string(),
            Self::Named { args, .. } => format!(
                "{}<{}>",
                self.short_name(),
                args.iter().map(Self::display_name).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(name) => f.write_str(name),
            Self::Named { path, args } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 可实例化的类
    Class,
    /// 抽象类
    AbstractClass,
    /// 接口（trait）
    Interface,
}

impl Default for TypeKind {
    fn default() -> Self {
        Self::Class
    }
}

/// 类型定义
///
/// 描述一个类型的声明形式：泛型形参、直接实现的接口和直接基类。
/// 接口和基类中可以引用本类型声明的泛型形参。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// 声明形式，例如 `app::Repository<T>`
    pub ty: TypeRef,
    /// 类型种类
    #[serde(default)]
    pub kind: TypeKind,
    /// 直接实现（或继承）的接口
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// 直接基类
    #[serde(default)]
    pub base: Option<TypeRef>,
}

impl TypeDefinition {
    /// 创建新的类型定义
    pub fn new(ty: TypeRef, kind: TypeKind) -> Self {
        Self {
            ty,
            kind,
            interfaces: Vec::new(),
            base: None,
        }
    }

    /// 创建类定义
    pub fn class(ty: TypeRef) -> Self {
        Self::new(ty, TypeKind::Class)
    }

    /// 创建抽象类定义
    pub fn abstract_class(ty: TypeRef) -> Self {
        Self::new(ty, TypeKind::AbstractClass)
    }

    /// 创建接口定义
    pub fn interface(ty: TypeRef) -> Self {
        Self::new(ty, TypeKind::Interface)
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// 设置基类
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// 完整名称
    pub fn full_name(&self) -> &str {
        self.ty.full_name()
    }

    /// 是否为接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否为抽象类型（抽象类或接口）
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::AbstractClass | TypeKind::Interface)
    }

    /// 为具体的类型引用计算形参替换表
    ///
    /// 声明中的每个形参映射到 `actual` 在同一位置上的实参。
    pub fn substitutions_for(&self, actual: &TypeRef) -> HashMap<String, TypeRef> {
        self.ty
            .generic_arguments()
            .iter()
            .zip(actual.generic_arguments())
            .filter_map(|(declared, actual)| match declared {
                TypeRef::Param(name) => Some((name.clone(), actual.clone())),
                TypeRef::Named { .. } => None,
            })
            .collect()
    }
}
