use rpal_values::{BinaryOp, UnaryOp, Value};

use crate::error::RuntimeError;

fn mismatch(expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

pub fn apply_unary(op: UnaryOp, operand: Value) -> Result<Value, RuntimeError> {
    match (op, &operand) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(-n)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, _) => Err(mismatch("integer", &operand)),
        (UnaryOp::Not, _) => Err(mismatch("truthvalue", &operand)),
    }
}

/// Applies `left OP right` (§4.5). The CSE machine's `Binary` dispatch pops
/// `left` first, then `right` (the ordering note in §4.4), and passes them
/// through in that order here.
pub fn apply_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    use BinaryOp::*;
    match op {
        Add | Sub | Mul | Div | Pow => arithmetic(op, left, right),
        And | Or => boolean(op, left, right),
        Eq => Ok(Value::Bool(scalar_eq(&left, &right))),
        Ne => Ok(Value::Bool(!scalar_eq(&left, &right))),
        Ls | Le | Gr | Ge => ordering(op, left, right),
        Aug => augment(left, right),
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (Value::Int(a), Value::Int(b)) = (&left, &right) else {
        let bad = if matches!(left, Value::Int(_)) { &right } else { &left };
        return Err(mismatch("integer", bad));
    };
    Ok(match op {
        BinaryOp::Add => Value::Int(a + b),
        BinaryOp::Sub => Value::Int(a - b),
        BinaryOp::Mul => Value::Int(a * b),
        BinaryOp::Div => {
            if *b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int(a / b)
        }
        BinaryOp::Pow => {
            let exponent: u32 = (*b).try_into().map_err(|_| RuntimeError::TypeMismatch {
                expected: "non-negative integer exponent".to_string(),
                found: b.to_string(),
            })?;
            Value::Int(a.pow(exponent))
        }
        _ => unreachable!(),
    })
}

fn boolean(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (Value::Bool(a), Value::Bool(b)) = (&left, &right) else {
        let bad = if matches!(left, Value::Bool(_)) { &right } else { &left };
        return Err(mismatch("truthvalue", bad));
    };
    Ok(match op {
        BinaryOp::And => Value::Bool(*a && *b),
        BinaryOp::Or => Value::Bool(*a || *b),
        _ => unreachable!(),
    })
}

fn scalar_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

fn ordering(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (Value::Int(a), Value::Int(b)) = (&left, &right) else {
        let bad = if matches!(left, Value::Int(_)) { &right } else { &left };
        return Err(mismatch("integer", bad));
    };
    Ok(Value::Bool(match op {
        BinaryOp::Ls => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gr => a > b,
        BinaryOp::Ge => a >= b,
        _ => unreachable!(),
    }))
}

/// `left aug right`: `left` must be a `Tuple` or `Nil` (treated as empty);
/// `right` is appended as a new last element. Builds a new `Tuple` rather
/// than mutating `left` in place (§9 Open Questions — a deliberate departure
/// from the reference implementation).
fn augment(left: Value, right: Value) -> Result<Value, RuntimeError> {
    let mut elements = match left {
        Value::Tuple(elems) => elems,
        Value::Nil => Vec::new(),
        other => return Err(mismatch("tuple", &other)),
    };
    elements.push(right);
    Ok(Value::Tuple(elements))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_respects_operand_order() {
        let result = apply_binary(BinaryOp::Sub, Value::Int(10), Value::Int(3)).unwrap();
        assert_eq!(result, Value::Int(7));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            apply_binary(BinaryOp::Div, Value::Int(1), Value::Int(0)).unwrap_err(),
            RuntimeError::DivisionByZero
        );
    }

    #[test]
    fn pow_rejects_a_negative_exponent() {
        assert!(apply_binary(BinaryOp::Pow, Value::Int(2), Value::Int(-1)).is_err());
    }

    #[test]
    fn pow_of_zero_is_one() {
        let result = apply_binary(BinaryOp::Pow, Value::Int(5), Value::Int(0)).unwrap();
        assert_eq!(result, Value::Int(1));
    }

    #[test]
    fn eq_across_distinct_tags_is_false() {
        let result = apply_binary(BinaryOp::Eq, Value::Int(1), Value::Str("1".into())).unwrap();
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn ne_across_distinct_tags_is_true() {
        let result = apply_binary(BinaryOp::Ne, Value::Int(1), Value::Str("1".into())).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn aug_does_not_mutate_original_and_appends_right() {
        let t = Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let result = apply_binary(BinaryOp::Aug, t.clone(), Value::Int(4)).unwrap();
        assert_eq!(
            result,
            Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)])
        );
        assert_eq!(t, Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn aug_on_nil_starts_a_fresh_tuple() {
        let result = apply_binary(BinaryOp::Aug, Value::Nil, Value::Int(1)).unwrap();
        assert_eq!(result, Value::Tuple(vec![Value::Int(1)]));
    }
}
