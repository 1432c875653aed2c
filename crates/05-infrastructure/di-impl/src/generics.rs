//! 泛型封闭
//!
//! 只支持单个泛型参数，但开放泛型可以多层嵌套，例如 `Wrapper<Inner<T>>`。

use infrastructure_common::{GenericClosingError, TypeRef};

/// 使用 `argument` 封闭泛型类型
///
/// - 非泛型类型原样返回
/// - 开放泛型（可能多层嵌套）逐层展开到最内层的形参，替换后再逐层包装回去
/// - 已封闭的泛型替换其唯一的实参
pub fn close_generic(definition: &TypeRef, argument: &TypeRef) -> Result<TypeRef, GenericClosingError> {
    if !definition.is_generic() {
        return Ok(definition.clone());
    }

    if !definition.contains_generic_parameters() {
        ensure_single_parameter(definition)?;
        return Ok(definition.with_arguments([argument.clone()]));
    }

    let mut stack = Vec::new();
    let mut current = definition;
    loop {
        ensure_single_parameter(current)?;
        let inner = &current.generic_arguments()[0];
        if inner.is_generic_parameter() {
            break;
        }
        stack.push(current);
        current = inner;
    }

    let mut closed = current.with_arguments([argument.clone()]);
    while let Some(outer) = stack.pop() {
        closed = outer.with_arguments([closed]);
    }

    Ok(closed)
}

fn ensure_single_parameter(ty: &TypeRef) -> Result<(), GenericClosingError> {
    if ty.arity() == 1 {
        return Ok(());
    }

    Err(GenericClosingError {
        definition: ty.to_string(),
        arity: ty.arity(),
    })
}
