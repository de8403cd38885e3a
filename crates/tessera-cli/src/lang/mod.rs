//! The demo language driven by the CLI.
//!
//! ```text
//! program      = (let_stmt | print_stmt)*
//! let_stmt     = "let" identifier "=" expr ";"
//! print_stmt   = "print" args ";"
//! args         = expr ("," expr)*
//! expr         = term sum_tail
//! sum_tail     = (("+" | "-") term)*
//! term         = factor product_tail
//! product_tail = (("*" | "/") factor)*
//! factor       = number | identifier | "-" factor | "(" expr ")"
//! ```
//!
//! Whitespace and `//` line comments are ignored.

pub mod ast;
mod eval;

#[cfg(test)]
mod lang_tests;

use tessera_lib::{Children, FuelLimits, Grammar, Parser, Step, Terminal, Value};

pub use ast::{BinaryOp, Expr, Node, Program, Stmt};
pub use eval::{EvalError, evaluate};

/// Builds the demo language parser.
pub fn parser(limits: FuelLimits) -> tessera_lib::Result<Parser<Node>> {
    let mut g = Grammar::<Node>::new();

    g.terminal(Terminal::pattern(r"\s+")?.ignored());
    g.terminal(Terminal::pattern(r"//[^\n]*")?.ignored());

    let let_kw = g.terminal("let");
    let print_kw = g.terminal("print");
    let number = g.terminal(Terminal::pattern("[0-9]+")?.named("number"));
    let identifier = g.terminal(Terminal::pattern("[A-Za-z_][A-Za-z0-9_]*")?.named("identifier"));
    let [assign, semicolon, comma, open, close] = ['=', ';', ',', '(', ')'].map(|c| g.terminal(c));
    let [plus, minus, star, slash] = ['+', '-', '*', '/'].map(|c| g.terminal(c));

    g.transform(number, |token| Node::Expr(Expr::number(token.text())));
    g.transform(identifier, |token| Node::Expr(Expr::variable(token.text())));

    let program = g.rule("program");
    let let_stmt = g.rule("let_stmt");
    let print_stmt = g.rule("print_stmt");
    let args = g.rule("args");
    let expr = g.rule("expr");
    let sum_tail = g.rule("sum_tail");
    let sum_step = g.rule("sum_step");
    let term = g.rule("term");
    let product_tail = g.rule("product_tail");
    let product_step = g.rule("product_step");
    let factor = g.rule("factor");
    let negation = g.rule("negation");
    let group = g.rule("group");

    g.define(program).cyclic_or([let_stmt, print_stmt]).on_match(|children| {
        let statements = children
            .into_iter()
            .filter_map(Value::into_node)
            .filter_map(Node::into_stmt)
            .collect();
        Node::Program(Program { statements })
    });

    g.define(let_stmt)
        .then(let_kw)
        .then(identifier)
        .then(assign)
        .then(expr)
        .then(semicolon)
        .on_match(|mut children| {
            let Some(Expr::Variable { name }) = children.node(1).and_then(Node::into_expr) else {
                return Node::Missing;
            };
            let Some(value) = children.node(3).and_then(Node::into_expr) else {
                return Node::Missing;
            };
            Node::Stmt(Stmt::Let { name, value })
        });

    g.define(print_stmt)
        .then(print_kw)
        .then(args)
        .then(semicolon)
        .on_match(|mut children| match children.node(1) {
            Some(Node::Args(args)) => Node::Stmt(Stmt::Print { args }),
            _ => Node::Missing,
        });

    g.define(args).repeat_separator(expr, comma).on_match(|children| {
        let args = children
            .into_iter()
            .filter_map(Value::into_node)
            .filter_map(Node::into_expr)
            .collect();
        Node::Args(args)
    });

    g.define(expr).then(term).then(sum_tail).on_match(fold);
    g.define(sum_tail).cyclic_or([sum_step]).on_match(collect_tail);
    g.define(sum_step).or([plus, minus]).then(term).on_match(operation);

    g.define(term).then(factor).then(product_tail).on_match(fold);
    g.define(product_tail).cyclic_or([product_step]).on_match(collect_tail);
    g.define(product_step).or([star, slash]).then(factor).on_match(operation);

    g.define(factor).or([
        Step::from(number),
        Step::from(identifier),
        Step::from(negation),
        Step::from(group),
    ]);
    g.define(negation).then(minus).then(factor).on_match(|mut children| {
        match children.node(1).and_then(Node::into_expr) {
            Some(operand) => Node::Expr(Expr::Negate {
                operand: Box::new(operand),
            }),
            None => Node::Missing,
        }
    });
    g.define(group).then(open).then(expr).then(close).on_match(|mut children| {
        children.node(1).unwrap_or(Node::Missing)
    });

    Ok(Parser::builder(g, program).limits(limits).build())
}

/// `operand tail` into a left-associative chain.
fn fold(mut children: Children<'_, Node>) -> Node {
    let Some(first) = children.node(0).and_then(Node::into_expr) else {
        return Node::Missing;
    };
    let tail = match children.node(1) {
        Some(Node::Tail(tail)) => tail,
        _ => Vec::new(),
    };
    let folded = tail
        .into_iter()
        .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs));
    Node::Expr(folded)
}

fn collect_tail(children: Children<'_, Node>) -> Node {
    let steps = children
        .into_iter()
        .filter_map(|value| match value.into_node() {
            Some(Node::Operation(op, operand)) => Some((op, operand)),
            _ => None,
        })
        .collect();
    Node::Tail(steps)
}

fn operation(mut children: Children<'_, Node>) -> Node {
    let op = children
        .token(0)
        .and_then(|token| BinaryOp::from_symbol(token.text()));
    match (op, children.node(1).and_then(Node::into_expr)) {
        (Some(op), Some(operand)) => Node::Operation(op, operand),
        _ => Node::Missing,
    }
}
