//! Log parsing for the KSPSolve benchmark output.

pub mod parse;
pub mod row;

pub use parse::SolveTimeParser;
pub use row::SolveSample;
