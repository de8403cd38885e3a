//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("tessera")
        .about("Backtracking parser-combinator runtime, driven over a demo language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(symbolize_command())
        .subcommand(parse_command())
        .subcommand(dump_command())
        .subcommand(trace_command())
}

/// Print the symbol stream of a program.
pub fn symbolize_command() -> Command {
    Command::new("symbolize")
        .about("Print the symbols of a program")
        .override_usage(
            "\
  tessera symbolize <SOURCE>
  tessera symbolize -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  tessera symbolize prog.tsr              # one symbol per line
  tessera symbolize prog.tsr --json       # symbols as JSON
  tessera symbolize -s 'let x = 1;'       # inline program"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(json_arg())
        .arg(color_arg())
}

/// Parse a program into its syntax tree.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse a program and print its syntax tree as JSON")
        .override_usage(
            "\
  tessera parse <SOURCE>
  tessera parse -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  tessera parse prog.tsr                  # pretty JSON tree
  tessera parse prog.tsr --compact        # single-line JSON
  tessera parse -s 'print 1 + 2;' --eval  # run the program
  cat prog.tsr | tessera parse -          # read stdin"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(eval_arg())
        .arg(compact_arg())
        .arg(fuel_arg())
        .arg(color_arg())
}

/// Show the compiled grammar.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the compiled demo grammar")
        .override_usage("  tessera dump")
}

/// Trace rule evaluation.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace rule evaluation for debugging")
        .override_usage(
            "\
  tessera trace <SOURCE>
  tessera trace -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  tessera trace prog.tsr                  # rule entry and exit
  tessera trace prog.tsr -v               # with matched symbols and backtracks
  tessera trace -s 'print 1;' -vv         # also terminal misses
  tessera trace prog.tsr --fuel 500       # stop after 500 steps"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(verbose_arg())
        .arg(fuel_arg())
        .arg(color_arg())
}
