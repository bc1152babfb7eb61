//! File I/O: mesh input, precomputation snapshots, result tables.

pub mod obj;
pub mod snapshot;
pub mod tables;

pub use obj::{read_obj, write_obj};
pub use snapshot::{read_snapshot, write_snapshot};
