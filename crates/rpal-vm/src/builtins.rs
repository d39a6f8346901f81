use rpal_values::Value;

use crate::error::RuntimeError;

/// Number of arguments a builtin consumes before it can be applied (§4.6).
/// Every builtin but `Conc` is unary; `Conc` needs two, collected across two
/// `Gamma` steps via `Value::Partial`.
pub fn arity(name: &str) -> usize {
    if name == "Conc" { 2 } else { 1 }
}

/// Applies a fully-saturated builtin call.
pub fn apply(name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match name {
        "Print" => Ok(args.into_iter().next().unwrap()),
        "Stem" => {
            let s = expect_str(name, &args[0])?;
            Ok(Value::Str(s.chars().next().map(|c| c.to_string()).unwrap_or_default()))
        }
        "Stern" => {
            let s = expect_str(name, &args[0])?;
            Ok(Value::Str(s.chars().skip(1).collect()))
        }
        "Conc" => {
            let s1 = expect_str(name, &args[0])?;
            let s2 = expect_str(name, &args[1])?;
            Ok(Value::Str(format!("{s1}{s2}")))
        }
        "Order" => Ok(Value::Int(tuple_len(&args[0]) as i64)),
        "Null" => Ok(Value::Bool(tuple_len(&args[0]) == 0)),
        "Isinteger" => Ok(Value::Bool(matches!(args[0], Value::Int(_)))),
        "Isstring" => Ok(Value::Bool(matches!(args[0], Value::Str(_)))),
        "Istuple" => Ok(Value::Bool(matches!(args[0], Value::Tuple(_) | Value::Nil))),
        "Isdummy" => Ok(Value::Bool(matches!(args[0], Value::Dummy))),
        "Istruthvalue" => Ok(Value::Bool(matches!(args[0], Value::Bool(_)))),
        "Isfunction" => Ok(Value::Bool(args[0].is_function())),
        "Itos" => match &args[0] {
            Value::Int(n) => Ok(Value::Str(n.to_string())),
            other => Err(RuntimeError::TypeMismatch {
                expected: "integer".to_string(),
                found: other.type_name().to_string(),
            }),
        },
        other => Err(RuntimeError::UnknownBuiltin {
            name: other.to_string(),
        }),
    }
}

fn expect_str(builtin: &str, value: &Value) -> Result<String, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(RuntimeError::TypeMismatch {
            expected: format!("string argument to {builtin}"),
            found: other.type_name().to_string(),
        }),
    }
}

fn tuple_len(value: &Value) -> usize {
    match value {
        Value::Tuple(elems) => elems.len(),
        Value::Nil => 0,
        _ => 0,
    }
}
