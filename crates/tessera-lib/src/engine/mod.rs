//! Rule evaluation: the symbol cursor, the backtracking evaluator and its
//! instrumentation.

pub mod cursor;
mod evaluator;
mod invariants;
pub mod trace;


pub use cursor::SymbolCursor;
pub use evaluator::{FuelLimits, MAX_REENTRIES};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};

pub(crate) use evaluator::{Evaluator, Furthest, Matched, Resolver};
