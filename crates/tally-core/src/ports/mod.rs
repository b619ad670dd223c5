//! Store ports
//!
//! The generator and the query service only talk to the stores through these
//! traits; concrete backends live in [`crate::storage`].

pub mod mirror;
pub mod records;

pub use mirror::MirrorTable;
pub use records::{CommittedIds, RecordStore};
