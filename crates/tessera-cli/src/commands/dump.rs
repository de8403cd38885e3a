//! Print the compiled demo grammar.

use tessera_lib::FuelLimits;

use crate::lang;

pub fn run() {
    let dump = lang::parser(FuelLimits::default()).and_then(|parser| parser.dump());
    match dump {
        Ok(dump) => print!("{}", dump),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
