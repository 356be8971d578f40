//! One authenticated account.
//!
//! Every data method follows the same protocol: make sure the local session
//! is valid (logging in when it is not), resolve the endpoint with the bare
//! account key, issue exactly one request with the session token, and pull
//! the documented field out of the response body.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::operation::{Operation, OperationOutput};
use crate::api::{ApiClient, ApiError, Endpoint, Result};
use crate::auth::{Clock, Credential, Session, SystemClock};
use crate::models::{
    AbsenceEvent, AgendaEvent, Card, Grade, Lesson, NoticeboardItem, Period, Profile,
    SchoolReport, Subject,
};
use crate::utils::dates::{school_year_end, school_year_start, validate_date};

pub struct AccountClient {
    credential: Credential,
    api: ApiClient,
    clock: Arc<dyn Clock>,
    session: Mutex<Session>,
    profile: Mutex<Option<Profile>>,
}

impl fmt::Debug for AccountClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountClient")
            .field("credential", &self.credential)
            .field("session", &*self.session())
            .finish()
    }
}

impl fmt::Display for AccountClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Classeviva account {}]", self.identifier())
    }
}

impl AccountClient {
    pub fn new(credential: Credential, api: ApiClient) -> Self {
        Self::with_clock(credential, api, Arc::new(SystemClock))
    }

    pub fn with_clock(credential: Credential, api: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: Mutex::new(Session::new(clock.clone())),
            profile: Mutex::new(None),
            credential,
            api,
            clock,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn identifier(&self) -> &str {
        self.credential.identifier()
    }

    pub fn account_key(&self) -> &str {
        self.credential.account_key()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_profile(&self) -> MutexGuard<'_, Option<Profile>> {
        self.profile.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local validity estimate; no network.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_valid()
    }

    pub fn token(&self) -> Result<String> {
        self.session().token().map(str::to_string)
    }

    pub fn session_expires_in(&self) -> Duration {
        self.session().time_until_expiry()
    }

    /// Identity cached from the last login.
    pub fn profile(&self) -> Result<Profile> {
        self.cached_profile()
            .clone()
            .ok_or_else(|| ApiError::NoProfileData(self.identifier().to_string()))
    }

    /// Log in unless the session is still locally valid.
    ///
    /// Not serialized: two concurrent calls on a fresh client both log in and
    /// the last response to arrive wins.
    pub async fn authenticate(&self) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }

        let login = self.api.login(&self.credential).await?;
        info!(account = self.identifier(), "Login successful");

        self.session().record_authentication(
            login.token.clone(),
            login.release.with_timezone(&Utc),
            login.expire.with_timezone(&Utc),
        );
        *self.cached_profile() = login.profile();
        Ok(())
    }

    async fn ensure_token(&self) -> Result<String> {
        self.authenticate().await?;
        self.token()
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let token = self.ensure_token().await?;
        self.api
            .fetch_json(&endpoint, self.account_key(), &token)
            .await
    }

    /// Fetch and extract the value at a JSON pointer. A missing or null field
    /// yields the type's default rather than an error.
    async fn fetch_field<T: DeserializeOwned + Default>(
        &self,
        endpoint: Endpoint,
        pointer: &str,
    ) -> Result<T> {
        let mut body: Value = self.fetch(endpoint).await?;
        match body.pointer_mut(pointer).map(Value::take) {
            None | Some(Value::Null) => {
                debug!(account = self.identifier(), field = pointer, "Field absent in response");
                Ok(T::default())
            }
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", pointer, e))),
        }
    }

    // ===== Session probes =====

    /// Ask the server whether the current token is still accepted.
    /// Never logs in; any failure reads as `false`.
    pub async fn status(&self) -> bool {
        let Ok(token) = self.token() else {
            return false;
        };
        self.api
            .fetch_json::<Value>(&Endpoint::Status, self.account_key(), &token)
            .await
            .is_ok()
    }

    pub async fn ticket_full(&self) -> Result<Value> {
        self.fetch(Endpoint::Ticket).await
    }

    pub async fn ticket(&self) -> Result<String> {
        self.fetch_field(Endpoint::Ticket, "/ticket").await
    }

    // ===== Documents =====

    pub async fn documents(&self) -> Result<Value> {
        self.fetch(Endpoint::Documents).await
    }

    pub async fn check_document(&self, document: &str) -> Result<bool> {
        let endpoint = Endpoint::DocumentCheck {
            document: document.to_string(),
        };
        self.fetch_field(endpoint, "/document/available").await
    }

    /// Report cards listed among the documents.
    pub async fn school_reports(&self) -> Result<Vec<SchoolReport>> {
        let reports: Option<Vec<SchoolReport>> = self
            .fetch_field(Endpoint::Documents, "/schoolReports")
            .await?;
        reports.ok_or_else(|| {
            ApiError::MissingData(format!("no school reports for {}", self.identifier()))
        })
    }

    // ===== Absences =====

    pub async fn absences(&self) -> Result<Vec<AbsenceEvent>> {
        self.fetch_field(Endpoint::Absences, "/events").await
    }

    pub async fn absences_from(&self, from: &str) -> Result<Vec<AbsenceEvent>> {
        let from = validate_date(from)?;
        self.fetch_field(Endpoint::AbsencesFrom { from }, "/events").await
    }

    pub async fn absences_between(&self, from: &str, to: &str) -> Result<Vec<AbsenceEvent>> {
        let from = validate_date(from)?;
        let to = validate_date(to)?;
        self.fetch_field(Endpoint::AbsencesBetween { from, to }, "/events").await
    }

    // ===== Agenda =====

    /// Agenda for the whole current school year.
    pub async fn agenda(&self) -> Result<Vec<AgendaEvent>> {
        let today = self.clock.today();
        let endpoint = Endpoint::Agenda {
            from: school_year_start(today)?,
            to: school_year_end(today)?,
        };
        self.fetch_field(endpoint, "/agenda").await
    }

    pub async fn agenda_between(&self, from: &str, to: &str) -> Result<Vec<AgendaEvent>> {
        let from = validate_date(from)?;
        let to = validate_date(to)?;
        self.fetch_field(Endpoint::Agenda { from, to }, "/agenda").await
    }

    // ===== Grades =====

    pub async fn grades(&self) -> Result<Vec<Grade>> {
        self.fetch_field(Endpoint::Grades, "/grades").await
    }

    pub async fn subjects(&self) -> Result<Vec<Subject>> {
        self.fetch_field(Endpoint::Subjects, "/subjects").await
    }

    pub async fn periods(&self) -> Result<Vec<Period>> {
        self.fetch_field(Endpoint::Periods, "/periods").await
    }

    // ===== Notes =====

    /// All disciplinary and teacher notes, grouped by category code.
    pub async fn notes(&self) -> Result<Value> {
        self.fetch(Endpoint::Notes).await
    }

    /// Text of one note. `kind` is the category code (NTTE, NTCL, NTWN, NTST).
    pub async fn read_note(&self, kind: &str, id: u64) -> Result<String> {
        let endpoint = Endpoint::NoteRead {
            kind: kind.to_string(),
            id,
        };
        self.fetch_field(endpoint, "/event/evtText").await
    }

    // ===== Noticeboard =====

    pub async fn noticeboard(&self) -> Result<Vec<NoticeboardItem>> {
        self.fetch_field(Endpoint::Noticeboard, "/items").await
    }

    pub async fn read_noticeboard_item(&self, code: &str, id: u64) -> Result<Value> {
        let endpoint = Endpoint::NoticeboardRead {
            code: code.to_string(),
            id,
        };
        self.fetch(endpoint).await
    }

    // ===== Lessons =====

    pub async fn lessons_today(&self) -> Result<Vec<Lesson>> {
        self.fetch_field(Endpoint::LessonsToday, "/lessons").await
    }

    pub async fn lessons_on(&self, day: &str) -> Result<Vec<Lesson>> {
        let day = validate_date(day)?;
        self.fetch_field(Endpoint::LessonsOn { day }, "/lessons").await
    }

    // ===== Overview =====

    /// Everything (agenda, grades, lessons, notes) in a date range. A missing
    /// bound defaults to the start or end of the current school year.
    pub async fn overview(&self, from: Option<&str>, to: Option<&str>) -> Result<Value> {
        let today = self.clock.today();
        let from = match from {
            Some(from) => validate_date(from)?,
            None => school_year_start(today)?,
        };
        let to = match to {
            Some(to) => validate_date(to)?,
            None => school_year_end(today)?,
        };
        self.fetch(Endpoint::Overview { from, to }).await
    }

    // ===== Other =====

    /// Raw avatar image bytes.
    pub async fn avatar(&self) -> Result<Vec<u8>> {
        let token = self.ensure_token().await?;
        self.api
            .fetch_bytes(&Endpoint::Avatar, self.account_key(), &token)
            .await
    }

    pub async fn card(&self) -> Result<Card> {
        self.fetch_field(Endpoint::Card, "/card").await
    }

    /// First schoolbook course listed for the account.
    pub async fn schoolbook(&self) -> Result<Value> {
        let course: Value = self.fetch_field(Endpoint::Schoolbooks, "/schoolbooks/0").await?;
        if course.is_null() {
            return Err(ApiError::MissingData(format!(
                "no schoolbooks for {}",
                self.identifier()
            )));
        }
        Ok(course)
    }

    /// Run one operation by value. Optional dates fall back the way the
    /// dedicated methods do: absences without `from` fetch everything,
    /// agenda without both bounds covers the school year.
    pub async fn run(&self, operation: &Operation) -> Result<OperationOutput> {
        let output = match operation {
            Operation::Ticket => OperationOutput::Text(self.ticket().await?),
            Operation::Documents => OperationOutput::Json(self.documents().await?),
            Operation::CheckDocument { document } => {
                OperationOutput::Flag(self.check_document(document).await?)
            }
            Operation::SchoolReports => {
                OperationOutput::SchoolReports(self.school_reports().await?)
            }
            Operation::Absences { from, to } => {
                let events = match (from.as_deref(), to.as_deref()) {
                    (None, _) => self.absences().await?,
                    (Some(from), None) => self.absences_from(from).await?,
                    (Some(from), Some(to)) => self.absences_between(from, to).await?,
                };
                OperationOutput::Absences(events)
            }
            Operation::Agenda { from, to } => {
                let events = match (from.as_deref(), to.as_deref()) {
                    (Some(from), Some(to)) => self.agenda_between(from, to).await?,
                    _ => self.agenda().await?,
                };
                OperationOutput::Agenda(events)
            }
            Operation::Grades => OperationOutput::Grades(self.grades().await?),
            Operation::Subjects => OperationOutput::Subjects(self.subjects().await?),
            Operation::Periods => OperationOutput::Periods(self.periods().await?),
            Operation::Notes => OperationOutput::Json(self.notes().await?),
            Operation::ReadNote { kind, id } => {
                OperationOutput::Text(self.read_note(kind, *id).await?)
            }
            Operation::Noticeboard => OperationOutput::Noticeboard(self.noticeboard().await?),
            Operation::ReadNoticeboardItem { code, id } => {
                OperationOutput::Json(self.read_noticeboard_item(code, *id).await?)
            }
            Operation::Lessons { day } => {
                let lessons = match day.as_deref() {
                    Some(day) => self.lessons_on(day).await?,
                    None => self.lessons_today().await?,
                };
                OperationOutput::Lessons(lessons)
            }
            Operation::Overview { from, to } => {
                OperationOutput::Json(self.overview(from.as_deref(), to.as_deref()).await?)
            }
            Operation::Avatar => OperationOutput::Avatar(self.avatar().await?),
            Operation::Card => OperationOutput::Card(self.card().await?),
            Operation::Schoolbook => OperationOutput::Json(self.schoolbook().await?),
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client(identifier: &str) -> AccountClient {
        let api = ApiClient::new(ClientConfig::default()).unwrap();
        AccountClient::new(Credential::new(identifier, "hunter2"), api)
    }

    #[test]
    fn test_fresh_client_state() {
        let client = client("S1234567");
        assert_eq!(client.account_key(), "1234567");
        assert!(!client.is_authenticated());
        assert!(matches!(client.token(), Err(ApiError::TokenMissing)));
        assert!(matches!(
            client.profile(),
            Err(ApiError::NoProfileData(ref id)) if id == "S1234567"
        ));
        assert_eq!(client.session_expires_in(), Duration::zero());
    }

    #[test]
    fn test_display_and_debug() {
        let client = client("S1234567");
        assert_eq!(client.to_string(), "[Classeviva account S1234567]");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("S1234567"));
    }

    #[tokio::test]
    async fn test_invalid_dates_fail_before_network() {
        // Default config points at the real service; these must fail locally
        let client = client("S1234567");
        assert!(matches!(
            client.absences_between("2024-13-45", "2024-06-30").await,
            Err(ApiError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            client.agenda_between("2024-09-01", "2024-02-30").await,
            Err(ApiError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            client.lessons_on("yesterday").await,
            Err(ApiError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            client.overview(Some("2024/09/01"), None).await,
            Err(ApiError::InvalidDateFormat(_))
        ));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_status_without_token_is_false() {
        assert!(!client("S1").status().await);
    }
}
