mod cli;
mod commands;
mod lang;

use cli::{ParseParams, SymbolizeParams, TraceParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("symbolize", m)) => {
            let params = SymbolizeParams::from_matches(m);
            commands::symbolize::run(params.into());
        }
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        Some(("dump", _)) => commands::dump::run(),
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
