//! Parse a demo program and print its syntax tree.

use std::path::PathBuf;

use serde::Serialize;

use super::run_common;
use super::source::require_source;
use crate::lang::{self, Node, Program};

pub struct ParseArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub eval: bool,
    pub compact: bool,
    pub fuel: Option<u32>,
    pub color: bool,
}

#[derive(Serialize)]
struct ParseOutput {
    program: Option<Program>,
    /// Statements parsed after skipping rejected input.
    recovered: Vec<Program>,
}

pub fn run(args: ParseArgs) {
    let source = require_source(args.source_path.as_deref(), args.source_text.as_deref());
    let parser = run_common::build_parser(run_common::limits(args.fuel));

    let parse = match parser.parse(&source.text) {
        Ok(parse) => parse,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let (value, recovered, diagnostics) = parse.into_parts();
    let program = value
        .and_then(|value| value.into_node())
        .and_then(Node::into_program);
    let recovered: Vec<Program> = recovered
        .into_iter()
        .filter_map(|value| value.into_node())
        .filter_map(Node::into_program)
        .collect();

    run_common::print_diagnostics(&diagnostics, &source, args.color);
    if !diagnostics.is_empty() {
        if args.eval {
            std::process::exit(1);
        }
        print_json(&ParseOutput { program, recovered }, args.compact);
        std::process::exit(1);
    }

    let program = program.unwrap_or_default();
    if args.eval {
        match lang::evaluate(&program) {
            Ok(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    print_json(&program, args.compact);
}

fn print_json(value: &impl Serialize, compact: bool) {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
