//! Pieces shared by the commands that run the demo parser.

use tessera_lib::{Diagnostics, FuelLimits, Parser};

use super::source::Source;
use crate::lang::{self, Node};

/// No cap unless `--fuel` was given.
pub fn limits(fuel: Option<u32>) -> FuelLimits {
    fuel.map_or_else(FuelLimits::new, |fuel| FuelLimits::new().exec_fuel(fuel))
}

pub fn build_parser(limits: FuelLimits) -> Parser<Node> {
    match lang::parser(limits) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Renders `diagnostics` against the source to stderr.
pub fn print_diagnostics(diagnostics: &Diagnostics, source: &Source, color: bool) {
    if diagnostics.is_empty() {
        return;
    }
    let mut printer = diagnostics.printer(&source.text).colored(color);
    if let Some(name) = &source.name {
        printer = printer.path(name);
    }
    eprintln!("{}", printer.render());
}
