// Application layer - the ledger operations exposed to any binding
// (CLI here; an HTTP or RPC layer would call the same service).

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
