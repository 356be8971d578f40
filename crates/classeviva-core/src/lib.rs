//! Client library for the Classeviva school register.
//!
//! Provides authenticated access to the register's read endpoints (grades,
//! absences, agenda, notes, noticeboard, lessons, documents) and batch
//! operations over several accounts at once.
//!
//! ```no_run
//! use classeviva_core::{AccountClient, ApiClient, ClientConfig, Credential};
//!
//! # async fn demo() -> classeviva_core::Result<()> {
//! let api = ApiClient::new(ClientConfig::default())?;
//! let student = AccountClient::new(Credential::new("S1234567", "password"), api);
//! // Logs in on first use, again once the session runs out
//! let grades = student.grades().await?;
//! println!("{} grades", grades.len());
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use account::{AccountClient, AccountCollection, MemberReport, Operation, OperationOutput};
pub use api::{ApiClient, ApiError, Endpoint, Result};
pub use auth::{Clock, Credential, ManualClock, Session, SystemClock, SESSION_LIFETIME_SECS};
pub use config::ClientConfig;
