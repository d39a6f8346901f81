mod builtins;
pub mod env;
pub mod error;
mod operators;
pub mod printer;

pub use error::RuntimeError;

use std::time::{Duration, Instant};

use rpal_controls::ControlProgram;
use rpal_values::{is_builtin, ControlSymbol, Value};

use env::Environments;

/// Executes `program` to a single value (§4.4), aborting with
/// [`RuntimeError::Timeout`] if it runs past `timeout` wall-clock time.
pub fn execute(program: &ControlProgram, timeout: Duration) -> Result<Value, RuntimeError> {
    let deadline = Instant::now() + timeout;
    let mut control = program.initial_control();
    let mut stack = program.initial_value_stack();
    let mut envs = Environments::new();
    let mut current_env = 0usize;

    while let Some(symbol) = control.pop() {
        if Instant::now() >= deadline {
            return Err(RuntimeError::Timeout);
        }
        step(program, symbol, &mut control, &mut stack, &mut envs, &mut current_env)?;
    }

    Ok(stack.pop().unwrap_or(Value::Nil))
}

fn step(
    program: &ControlProgram,
    symbol: ControlSymbol,
    control: &mut Vec<ControlSymbol>,
    stack: &mut Vec<Value>,
    envs: &mut Environments,
    current_env: &mut usize,
) -> Result<(), RuntimeError> {
    match symbol {
        ControlSymbol::Identifier(name) => {
            let value = envs
                .lookup(*current_env, &name)
                .unwrap_or(Value::Name(name));
            stack.push(value);
        }
        ControlSymbol::Literal(lit) => stack.push(Value::from(lit)),
        ControlSymbol::Lambda { control_index, parameters } => {
            stack.push(Value::Lambda {
                control_index,
                parameters,
                captured_env_index: *current_env,
            });
        }
        ControlSymbol::Ystar => stack.push(Value::Ystar),
        ControlSymbol::Delta(seg) => control.extend(program.segment(seg).iter().cloned()),
        ControlSymbol::B(symbols) => control.extend(symbols),
        ControlSymbol::Tau(k) => {
            let mut elements = Vec::with_capacity(k);
            for _ in 0..k {
                elements.push(pop(stack)?);
            }
            stack.push(Value::Tuple(elements));
        }
        ControlSymbol::Unary(op) => {
            let operand = pop(stack)?;
            stack.push(operators::apply_unary(op, operand)?);
        }
        ControlSymbol::Binary(op) => {
            let left = pop(stack)?;
            let right = pop(stack)?;
            stack.push(operators::apply_binary(op, left, right)?);
        }
        ControlSymbol::Beta => {
            let condition = pop(stack)?;
            let Value::Bool(cond) = condition else {
                return Err(RuntimeError::TypeMismatch {
                    expected: "truthvalue".to_string(),
                    found: condition.type_name().to_string(),
                });
            };
            // The else branch removes the *penultimate* control symbol (the
            // then-delta), leaving only the chosen delta on top (§4.4). With
            // a `Vec` popped from the tail, "penultimate" is the
            // second-from-top entry.
            if cond {
                // Condition true: drop the else-delta sitting on top, leaving
                // the then-delta as the new top.
                control.pop();
            } else {
                // Condition false: drop the then-delta one below the top,
                // leaving the else-delta on top.
                let else_delta = control.pop();
                control.pop();
                if let Some(else_delta) = else_delta {
                    control.push(else_delta);
                }
            }
        }
        ControlSymbol::EnvMarker(i) => {
            let result = pop(stack)?;
            stack.pop(); // discard the matching Value::EnvMarker gamma pushed
            *current_env = envs.deactivate(i);
            stack.push(result);
        }
        ControlSymbol::Gamma => gamma(control, stack, envs, current_env)?,
    }
    Ok(())
}

fn gamma(
    control: &mut Vec<ControlSymbol>,
    stack: &mut Vec<Value>,
    envs: &mut Environments,
    current_env: &mut usize,
) -> Result<(), RuntimeError> {
    let rator = pop(stack)?;
    match rator {
        Value::Lambda { control_index, parameters, captured_env_index } => {
            let new_env = envs.create(captured_env_index);
            if parameters.len() == 1 {
                let arg = pop(stack)?;
                envs.bind(new_env, parameters[0].clone(), arg);
            } else {
                let arg = pop(stack)?;
                let Value::Tuple(elements) = arg else {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "tuple".to_string(),
                        found: arg.type_name().to_string(),
                    });
                };
                if elements.len() != parameters.len() {
                    return Err(RuntimeError::ArityMismatch {
                        expected: parameters.len(),
                        found: elements.len(),
                    });
                }
                for (param, value) in parameters.into_iter().zip(elements) {
                    envs.bind(new_env, param, value);
                }
            }
            stack.push(Value::EnvMarker(new_env));
            control.push(ControlSymbol::EnvMarker(new_env));
            control.push(ControlSymbol::Delta(control_index));
            *current_env = new_env;
        }
        Value::Tuple(elements) => {
            let index_arg = pop(stack)?;
            let Value::Int(index) = index_arg else {
                return Err(RuntimeError::TypeMismatch {
                    expected: "integer".to_string(),
                    found: index_arg.type_name().to_string(),
                });
            };
            if index < 1 || index as usize > elements.len() {
                return Err(RuntimeError::IndexOutOfBounds {
                    index,
                    length: elements.len(),
                });
            }
            stack.push(elements[(index - 1) as usize].clone());
        }
        Value::Ystar => {
            let lam = pop(stack)?;
            let Value::Lambda { control_index, parameters, captured_env_index } = lam else {
                return Err(RuntimeError::TypeMismatch {
                    expected: "function".to_string(),
                    found: lam.type_name().to_string(),
                });
            };
            stack.push(Value::Eta { control_index, parameters, captured_env_index });
        }
        Value::Eta { control_index, parameters, captured_env_index } => {
            let eta = Value::Eta { control_index, parameters: parameters.clone(), captured_env_index };
            let underlying = Value::Lambda { control_index, parameters, captured_env_index };
            stack.push(eta);
            stack.push(underlying);
            control.push(ControlSymbol::Gamma);
            control.push(ControlSymbol::Gamma);
        }
        Value::Name(name) if is_builtin(&name) => {
            apply_builtin(&name, Vec::new(), stack)?;
        }
        Value::Partial { name, args } => {
            apply_builtin(&name, args, stack)?;
        }
        other => {
            return Err(RuntimeError::TypeMismatch {
                expected: "function, tuple, or <Y*>".to_string(),
                found: other.type_name().to_string(),
            });
        }
    }
    Ok(())
}

fn apply_builtin(name: &str, mut args: Vec<Value>, stack: &mut Vec<Value>) -> Result<(), RuntimeError> {
    args.push(pop(stack)?);
    if args.len() < builtins::arity(name) {
        stack.push(Value::Partial { name: name.to_string(), args });
    } else {
        stack.push(builtins::apply(name, args)?);
    }
    Ok(())
}

fn pop(stack: &mut Vec<Value>) -> Result<Value, RuntimeError> {
    stack.pop().ok_or(RuntimeError::TypeMismatch {
        expected: "a value".to_string(),
        found: "empty stack".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpal_tree::parse_listing;

    fn run(source: &str) -> Value {
        let listing = rpal_parser::parse(source).unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        let root = rpal_standardizer::standardize(&mut tree).unwrap();
        let program = rpal_controls::build(&tree, root).unwrap();
        execute(&program, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn scenario_let_binding() {
        assert_eq!(run("let x = 5 in x + 3"), Value::Int(8));
    }

    #[test]
    fn scenario_factorial() {
        assert_eq!(
            run("let rec F n = n eq 0 -> 1 | n * F(n-1) in F 5"),
            Value::Int(120)
        );
    }

    #[test]
    fn scenario_where_clause_sum() {
        assert_eq!(
            run(
                "let Sum(A) = Psum(A, Order A) where rec Psum(T,N) = N eq 0 -> 0 | Psum(T,N-1) + T N in Sum(1,2,3,4,5)"
            ),
            Value::Int(15)
        );
    }

    #[test]
    fn env_marker_leaves_only_the_lambda_result_on_the_stack() {
        assert_eq!(run("(let a = 1 in a) + 2"), Value::Int(3));
    }

    #[test]
    fn scenario_reverse_string() {
        assert_eq!(
            run("let rev s = s eq '' -> '' | Conc (rev (Stern s)) (Stem s) in rev 'abc'"),
            Value::Str("cba".to_string())
        );
    }

    #[test]
    fn scenario_tuple_order() {
        assert_eq!(
            run("let t = (1, 'two', true) in Order t"),
            Value::Int(3)
        );
    }

    #[test]
    fn scenario_aug() {
        assert_eq!(
            run("(1,2,3) aug 4"),
            Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)])
        );
    }

    #[test]
    fn tuple_indexing_out_of_bounds_errors() {
        let listing = rpal_parser::parse("(1,2,3) 5").unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        let root = rpal_standardizer::standardize(&mut tree).unwrap();
        let program = rpal_controls::build(&tree, root).unwrap();
        assert_eq!(
            execute(&program, Duration::from_secs(2)).unwrap_err(),
            RuntimeError::IndexOutOfBounds { index: 5, length: 3 }
        );
    }

    #[test]
    fn timeout_is_reported() {
        let listing = rpal_parser::parse("let rec loop x = loop x in loop 0").unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        let root = rpal_standardizer::standardize(&mut tree).unwrap();
        let program = rpal_controls::build(&tree, root).unwrap();
        assert_eq!(
            execute(&program, Duration::from_millis(50)).unwrap_err(),
            RuntimeError::Timeout
        );
    }

    proptest::proptest! {
        /// Subtraction and division are order-sensitive; this pins down that
        /// `a - b` and `a / b` read as left-minus-right and left-over-right for
        /// any pair of distinct integers, never the reverse (§4.4's pop-order
        /// note, §8).
        #[test]
        fn subtraction_reads_left_minus_right(a in 1i64..1000, b in 0i64..1000) {
            let source = format!("{a} - {b}");
            proptest::prop_assert_eq!(run(&source), Value::Int(a - b));
        }

        /// Running the same program twice produces the same value (§8
        /// determinism property).
        #[test]
        fn execution_is_deterministic(a in 0i64..1000, b in 1i64..1000) {
            let source = format!("let x = {a} in let y = {b} in x * y + x");
            proptest::prop_assert_eq!(run(&source), run(&source));
        }
    }
}
