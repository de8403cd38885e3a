//! Tree-walking interpreter for demo programs.

use std::collections::HashMap;

use super::ast::{BinaryOp, Expr, Program, Stmt};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("number `{0}` is out of range")]
    NumberOutOfRange(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,
}

/// Runs `program`, returning one output line per `print` statement.
pub fn evaluate(program: &Program) -> Result<Vec<String>, EvalError> {
    let mut env: HashMap<&str, i64> = HashMap::new();
    let mut output = Vec::new();

    for stmt in &program.statements {
        match stmt {
            Stmt::Let { name, value } => {
                let value = eval_expr(value, &env)?;
                env.insert(name.as_str(), value);
            }
            Stmt::Print { args } => {
                let values = args
                    .iter()
                    .map(|arg| eval_expr(arg, &env).map(|v| v.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                output.push(values.join(" "));
            }
        }
    }

    Ok(output)
}

fn eval_expr(expr: &Expr, env: &HashMap<&str, i64>) -> Result<i64, EvalError> {
    match expr {
        Expr::Number { digits } => digits
            .parse()
            .map_err(|_| EvalError::NumberOutOfRange(digits.clone())),
        Expr::Variable { name } => env
            .get(name.as_str())
            .copied()
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
        Expr::Negate { operand } => eval_expr(operand, env)?
            .checked_neg()
            .ok_or(EvalError::Overflow),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, env)?;
            let rhs = eval_expr(rhs, env)?;
            match op {
                BinaryOp::Add => lhs.checked_add(rhs).ok_or(EvalError::Overflow),
                BinaryOp::Sub => lhs.checked_sub(rhs).ok_or(EvalError::Overflow),
                BinaryOp::Mul => lhs.checked_mul(rhs).ok_or(EvalError::Overflow),
                BinaryOp::Div if rhs == 0 => Err(EvalError::DivisionByZero),
                BinaryOp::Div => lhs.checked_div(rhs).ok_or(EvalError::Overflow),
            }
        }
    }
}
