//! Driving the transfer backend once per partition
//!
//! This module provides:
//! - **layout**: the `main/root`, `pkg/<name>/root`, `orphan/root`
//!   destination sub-roots
//! - **transfer**: the seam to the program that actually copies files
//! - **engine**: persisting each partition as a path list and handing it
//!   to the transfer backend

mod engine;
mod layout;
mod transfer;

pub use engine::{PackageTransfers, SyncEngine, SyncOptions, SyncReport};
pub use layout::DestLayout;
pub use transfer::{Transfer, TransferRequest};
