pub mod dump;
pub mod parse;
pub mod run_common;
pub mod source;
pub mod symbolize;
pub mod trace;
