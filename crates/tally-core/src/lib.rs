//! Tally Core Library
//!
//! Store ports and their implementations, the typed mirror facade, and the
//! configuration and logging setup shared by the generator and the query
//! service.

// Re-export pure types from tally-types
pub use tally_types::*;

pub mod config;
pub mod error;
pub mod logging;
pub mod mirror;
pub mod ports;
pub mod storage;

pub use error::{Result, TallyError};
pub use mirror::Mirror;
pub use ports::{CommittedIds, MirrorTable, RecordStore};
