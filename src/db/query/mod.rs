mod executor;
mod report;
mod runner;
mod script;
mod types;

pub use executor::*;
pub use report::*;
pub use runner::*;
pub use script::*;
pub use types::*;

#[cfg(test)]
mod runner_tests;
