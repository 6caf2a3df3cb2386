//! The exercise methods: `sum`, `multiply`, `subtract` and `divide`
//!
//! Each handler resolves its own parameter shape, coerces operands through
//! [`Number`], and reports every failure as an `Invalid params` error.

use serde_json::Value;

use crate::domain::numbers::Number;
use crate::errors::RpcError;
use crate::rpc::registry::{HandlerResult, MethodRegistry, Params};

pub const METHOD_NAMES: [&str; 4] = ["sum", "multiply", "subtract", "divide"];

const AT_LEAST_ONE: &str = "Invalid params: at least one number required";
const ITEMS_MUST_BE_NUMBERS: &str = "Invalid params: items must be numbers";
const EXPECTED_TWO: &str = "Invalid params: expected two numbers";

pub fn is_known_method(name: &str) -> bool {
    handler_for(name).is_some()
}

pub type MethodFn = fn(Params) -> HandlerResult;

pub fn handler_for(name: &str) -> Option<MethodFn> {
    match name {
        "sum" => Some(sum as MethodFn),
        "multiply" => Some(multiply as MethodFn),
        "subtract" => Some(subtract as MethodFn),
        "divide" => Some(divide as MethodFn),
        _ => None,
    }
}

/// Every exercise method.
pub fn default_registry() -> MethodRegistry {
    registry_for(&METHOD_NAMES)
}

/// Only the named methods. Unknown names are skipped; callers validate them first.
pub fn registry_for<S: AsRef<str>>(names: &[S]) -> MethodRegistry {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            handler_for(name).map(|handler| (name, handler))
        })
        .fold(MethodRegistry::builder(), |builder, (name, handler)| {
            builder.method(name, handler)
        })
        .build()
}

/// `sum`: positional operands only.
pub fn sum(params: Params) -> HandlerResult {
    let Params::Positional(items) = params else {
        return Err(RpcError::invalid_params("Invalid params"));
    };

    let operands = operand_list(&items)?;
    fold_operands(operands, Number::plus)
}

/// `multiply`: positional operands, or `{"values": [...]}`.
pub fn multiply(params: Params) -> HandlerResult {
    let items = match params {
        Params::Positional(items) => items,
        Params::Named(mut map) => match map.remove("values") {
            Some(Value::Array(items)) => items,
            _ => return Err(RpcError::invalid_params(AT_LEAST_ONE)),
        },
    };

    let operands = operand_list(&items)?;
    fold_operands(operands, Number::times)
}

/// `subtract`: `[minuend, subtrahend]` or `{"minuend", "subtrahend"}`.
pub fn subtract(params: Params) -> HandlerResult {
    let (minuend, subtrahend) = operand_pair(params, ("minuend", "subtrahend"))?;
    minuend.minus(subtrahend).to_value()
}

/// `divide`: `[dividend, divisor]` or `{"dividend", "divisor"}`.
pub fn divide(params: Params) -> HandlerResult {
    let (dividend, divisor) = operand_pair(params, ("dividend", "divisor"))?;
    dividend.divided_by(divisor)?.to_value()
}

fn operand_list(items: &[Value]) -> Result<Vec<Number>, RpcError> {
    if items.is_empty() {
        return Err(RpcError::invalid_params(AT_LEAST_ONE));
    }

    items
        .iter()
        .map(Number::from_value)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| RpcError::invalid_params(ITEMS_MUST_BE_NUMBERS))
}

fn fold_operands(operands: Vec<Number>, op: fn(Number, Number) -> Number) -> HandlerResult {
    let mut operands = operands.into_iter();
    let first = operands
        .next()
        .ok_or_else(|| RpcError::invalid_params(AT_LEAST_ONE))?;
    operands.fold(first, op).to_value()
}

/// Extracts two role-named operands. Extra positional items are ignored.
fn operand_pair(params: Params, roles: (&str, &str)) -> Result<(Number, Number), RpcError> {
    let (left, right) = match &params {
        Params::Positional(items) => {
            if items.len() < 2 {
                return Err(RpcError::invalid_params(EXPECTED_TWO));
            }
            (Some(&items[0]), Some(&items[1]))
        }
        Params::Named(map) => (map.get(roles.0), map.get(roles.1)),
    };

    match (
        left.and_then(Number::from_value),
        right.and_then(Number::from_value),
    ) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(RpcError::invalid_params(format!(
            "Invalid params: {} and {} must be numbers",
            roles.0, roles.1
        ))),
    }
}
