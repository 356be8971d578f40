//! Deduplicating set of accounts with concurrent batch operations.
//!
//! Two accounts are the same member when their bare account key and secret
//! match, so `S1234567` and `1234567` with one password collapse into one
//! entry while the same key with a different password does not.
//!
//! Batch calls launch every member's future before awaiting any of them.
//! `authenticate_all` reports the first failed login; every other batch call
//! logs per-member failures and reports them as `None`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::client::AccountClient;
use super::operation::{Operation, OperationOutput};
use crate::api::{ApiError, Result};
use crate::models::{AbsenceEvent, Grade};

/// Name shown when an account's profile is not available
const UNKNOWN_NAME: &str = "N/D";

/// One member's share of a batch fetch.
#[derive(Debug, Clone, Serialize)]
pub struct MemberReport<T> {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStatus {
    pub identifier: String,
    pub authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub authenticated: usize,
    pub unauthenticated: usize,
    pub members: Vec<MemberStatus>,
}

#[derive(Debug, Default)]
pub struct AccountCollection {
    members: Vec<Arc<AccountClient>>,
}

impl fmt::Display for AccountCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[AccountCollection with {} accounts]", self.len())
    }
}

impl AccountCollection {
    /// Build from any clients, keeping the first of each duplicate.
    pub fn new<I>(clients: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<AccountClient>>,
    {
        let mut collection = Self::default();
        for client in clients {
            collection.add(client);
        }
        collection
    }

    /// Insert unless a member with the same key and secret exists.
    /// Returns whether the client was inserted.
    pub fn add(&mut self, client: impl Into<Arc<AccountClient>>) -> bool {
        let client = client.into();
        let duplicate = self
            .members
            .iter()
            .any(|member| member.credential().same_login(client.credential()));
        if duplicate {
            debug!(account = client.identifier(), "Duplicate account not added");
            return false;
        }
        self.members.push(client);
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AccountClient>> {
        self.members.iter()
    }

    /// Members whose session is locally valid.
    pub fn authenticated(&self) -> Vec<Arc<AccountClient>> {
        self.filtered(|client| client.is_authenticated())
    }

    /// Members that would log in on their next request.
    pub fn unauthenticated(&self) -> Vec<Arc<AccountClient>> {
        self.filtered(|client| !client.is_authenticated())
    }

    /// New collection sharing the matching clients (and their sessions).
    pub fn filter<F>(&self, predicate: F) -> AccountCollection
    where
        F: Fn(&AccountClient) -> bool,
    {
        AccountCollection {
            members: self.filtered(predicate),
        }
    }

    fn filtered<F>(&self, predicate: F) -> Vec<Arc<AccountClient>>
    where
        F: Fn(&AccountClient) -> bool,
    {
        self.members
            .iter()
            .filter(|client| predicate(client))
            .cloned()
            .collect()
    }

    /// Log in every member without a valid session, all at once.
    ///
    /// Waits for every attempt; fails with the first error in member order,
    /// which is not necessarily the first login to be rejected in time.
    /// Members that did log in keep their sessions.
    pub async fn authenticate_all(&self) -> Result<()> {
        let pending = self.unauthenticated();
        if pending.is_empty() {
            return Ok(());
        }
        info!(count = pending.len(), "Authenticating accounts");

        let results = join_all(pending.iter().map(|client| client.authenticate())).await;

        let mut first_error = None;
        for (client, result) in pending.iter().zip(results) {
            if let Err(e) = result {
                warn!(account = client.identifier(), error = %e, "Login failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Apply an async function to every member concurrently.
    /// Results are in member order; a failed member yields `None`.
    pub async fn map_all<'a, F, Fut, T>(&'a self, f: F) -> Vec<Option<T>>
    where
        F: Fn(&'a AccountClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let f = &f;
        let tasks = self.members.iter().map(|client| async move {
            match f(client.as_ref()).await {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(account = client.identifier(), error = %e, "Operation failed");
                    None
                }
            }
        });
        join_all(tasks).await
    }

    /// Run one operation on every member.
    pub async fn apply_to_all(&self, operation: &Operation) -> Vec<Option<OperationOutput>> {
        debug!(operation = operation.name(), members = self.len(), "Applying to all accounts");
        self.map_all(|client| client.run(operation)).await
    }

    pub async fn grades_for_all(&self) -> Vec<Option<MemberReport<Vec<Grade>>>> {
        self.map_all(|client| async move {
            let grades = client.grades().await?;
            Ok::<_, ApiError>(member_report(client, grades))
        })
        .await
    }

    pub async fn absences_for_all(&self) -> Vec<Option<MemberReport<Vec<AbsenceEvent>>>> {
        self.map_all(|client| async move {
            let absences = client.absences().await?;
            Ok::<_, ApiError>(member_report(client, absences))
        })
        .await
    }

    pub fn statistics(&self) -> CollectionStats {
        let members: Vec<MemberStatus> = self
            .members
            .iter()
            .map(|client| MemberStatus {
                identifier: client.identifier().to_string(),
                authenticated: client.is_authenticated(),
            })
            .collect();
        let authenticated = members.iter().filter(|m| m.authenticated).count();
        CollectionStats {
            total: members.len(),
            authenticated,
            unauthenticated: members.len() - authenticated,
            members,
        }
    }
}

fn member_report<T>(client: &AccountClient, data: T) -> MemberReport<T> {
    let (first_name, last_name) = match client.profile() {
        Ok(profile) => (profile.first_name, profile.last_name),
        Err(_) => (UNKNOWN_NAME.to_string(), UNKNOWN_NAME.to_string()),
    };
    MemberReport {
        identifier: client.identifier().to_string(),
        first_name,
        last_name,
        data,
    }
}
