//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the unresolved
//! `ColorChoice` and raw verbosity count, so extraction can be tested without
//! a terminal.

use std::path::PathBuf;

use clap::ArgMatches;
use tessera_lib::Verbosity;

use super::ColorChoice;
use crate::commands::parse::ParseArgs;
use crate::commands::symbolize::SymbolizeArgs;
use crate::commands::trace::TraceArgs;

pub struct SymbolizeParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub json: bool,
    pub color: ColorChoice,
}

impl SymbolizeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<SymbolizeParams> for SymbolizeArgs {
    fn from(p: SymbolizeParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ParseParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub eval: bool,
    pub compact: bool,
    pub fuel: Option<u32>,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            eval: m.get_flag("eval"),
            compact: m.get_flag("compact"),
            fuel: m.get_one::<u32>("fuel").copied(),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            eval: p.eval,
            compact: p.compact,
            fuel: p.fuel,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub verbose: u8,
    pub fuel: Option<u32>,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            verbose: m.get_count("verbose"),
            fuel: m.get_one::<u32>("fuel").copied(),
            color: parse_color(m),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        match self.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            verbosity: p.verbosity(),
            source_path: p.source_path,
            source_text: p.source_text,
            fuel: p.fuel,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
