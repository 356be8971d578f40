//! Authentication module for managing sessions and credentials.
//!
//! This module provides:
//! - `Session`: token state with a local expiry estimate
//! - `Credential`: identifier/password pair and its bare account key
//! - `Clock`: injectable time source for expiry checks
//!
//! Sessions live in memory only and expire 90 minutes after the server
//! released the token.

pub mod clock;
pub mod credentials;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::Credential;
pub use session::{Session, SessionData, SESSION_LIFETIME_SECS};
