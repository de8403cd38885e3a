//! Print the symbols of a demo program.

use std::path::PathBuf;

use serde::Serialize;
use tessera_lib::FuelLimits;

use super::run_common;
use super::source::require_source;

pub struct SymbolizeArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub json: bool,
    pub color: bool,
}

#[derive(Serialize)]
struct SymbolRecord<'a> {
    terminal: String,
    start: usize,
    end: usize,
    /// Absent for literal terminals.
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

pub fn run(args: SymbolizeArgs) {
    let source = require_source(args.source_path.as_deref(), args.source_text.as_deref());
    let parser = run_common::build_parser(FuelLimits::default());

    let stream = match parser.symbolize(&source.text) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let grammar = parser.grammar();
    let records: Vec<SymbolRecord<'_>> = stream
        .symbols()
        .iter()
        .map(|symbol| SymbolRecord {
            terminal: grammar.terminal_name(symbol.terminal()),
            start: symbol.offset(),
            end: symbol.offset() + symbol.len(),
            text: symbol.text(&source.text),
        })
        .collect();

    if args.json {
        match serde_json::to_string_pretty(&records) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        for (record, symbol) in records.iter().zip(stream.symbols()) {
            let text = symbol.raw_text(&source.text);
            println!("{}..{} {} {:?}", record.start, record.end, record.terminal, text);
        }
    }

    run_common::print_diagnostics(stream.diagnostics(), &source, args.color);
    if !stream.is_ok() {
        std::process::exit(1);
    }
}
