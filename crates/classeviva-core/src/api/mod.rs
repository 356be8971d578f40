//! REST API module for the Classeviva register.
//!
//! This module provides the `ApiClient` HTTP layer, the `Endpoint`
//! resolver mapping operations to request targets, and the `ApiError`
//! taxonomy shared by the whole crate.
//!
//! Authenticated requests carry the session token in the `Z-Auth-Token`
//! header obtained from `/auth/login`.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use endpoints::Endpoint;
pub use error::{ApiError, Result};
