pub mod connection;
pub mod error;
pub mod query;
pub mod records;
pub mod session;

#[cfg(test)]
pub mod memory;

pub use connection::*;
pub use error::*;
pub use query::*;
pub use session::*;
