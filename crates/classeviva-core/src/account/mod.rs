//! Accounts and account collections.
//!
//! - `AccountClient`: one login with its session and cached profile
//! - `AccountCollection`: deduplicated accounts with batch fan-out
//! - `Operation`: typed description of a data request for batch use

pub mod client;
pub mod collection;
pub mod operation;

pub use client::AccountClient;
pub use collection::{AccountCollection, CollectionStats, MemberReport, MemberStatus};
pub use operation::{Operation, OperationOutput};
