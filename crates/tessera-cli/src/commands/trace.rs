//! Trace rule evaluation over a demo program.

use std::path::PathBuf;

use tessera_lib::{PrintTracer, Verbosity};

use super::run_common;
use super::source::require_source;

pub struct TraceArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub verbosity: Verbosity,
    pub fuel: Option<u32>,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let source = require_source(args.source_path.as_deref(), args.source_text.as_deref());
    let parser = run_common::build_parser(run_common::limits(args.fuel));

    let compiled = match parser.compile() {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let mut tracer = PrintTracer::new(&source.text, compiled, args.verbosity);
    let result = parser.parse_traced(&source.text, &mut tracer);
    tracer.print();

    match result {
        Ok(parse) => {
            run_common::print_diagnostics(parse.diagnostics(), &source, args.color);
            if !parse.diagnostics().is_empty() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
