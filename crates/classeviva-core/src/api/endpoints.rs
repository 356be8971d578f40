//! Endpoint resolver.
//!
//! Maps every remote operation to its HTTP method and path relative to the
//! configured base URL, and knows which remote error codes each endpoint
//! documents. Date path segments use `YYYYMMDD`.

use chrono::NaiveDate;
use reqwest::{Method, StatusCode};

use super::error::{remote_error_code, ApiError};
use crate::utils::dates::remote_segment;

/// Fixed trailing segment the noticeboard read endpoint expects
const NOTICEBOARD_READ_SUFFIX: u32 = 101;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Status,
    Ticket,
    Documents,
    DocumentCheck { document: String },
    Absences,
    AbsencesFrom { from: NaiveDate },
    AbsencesBetween { from: NaiveDate, to: NaiveDate },
    Agenda { from: NaiveDate, to: NaiveDate },
    Grades,
    Subjects,
    Periods,
    Notes,
    NoteRead { kind: String, id: u64 },
    Noticeboard,
    NoticeboardRead { code: String, id: u64 },
    LessonsToday,
    LessonsOn { day: NaiveDate },
    Overview { from: NaiveDate, to: NaiveDate },
    Avatar,
    Card,
    Schoolbooks,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login
            | Endpoint::Documents
            | Endpoint::DocumentCheck { .. }
            | Endpoint::NoteRead { .. }
            | Endpoint::NoticeboardRead { .. } => Method::POST,
            _ => Method::GET,
        }
    }

    /// Path relative to the base URL for the given bare account key.
    pub fn path(&self, account: &str) -> String {
        match self {
            Endpoint::Login => "/auth/login".to_string(),
            Endpoint::Status => "/auth/status".to_string(),
            Endpoint::Ticket => "/auth/ticket".to_string(),
            Endpoint::Documents => format!("/students/{}/documents", account),
            Endpoint::DocumentCheck { document } => {
                format!("/students/{}/documents/check/{}", account, document)
            }
            Endpoint::Absences => format!("/students/{}/absences/details", account),
            Endpoint::AbsencesFrom { from } => format!(
                "/students/{}/absences/details/{}",
                account,
                remote_segment(*from)
            ),
            Endpoint::AbsencesBetween { from, to } => format!(
                "/students/{}/absences/details/{}/{}",
                account,
                remote_segment(*from),
                remote_segment(*to)
            ),
            Endpoint::Agenda { from, to } => format!(
                "/students/{}/agenda/all/{}/{}",
                account,
                remote_segment(*from),
                remote_segment(*to)
            ),
            Endpoint::Grades => format!("/students/{}/grades", account),
            Endpoint::Subjects => format!("/students/{}/subjects", account),
            Endpoint::Periods => format!("/students/{}/periods", account),
            Endpoint::Notes => format!("/students/{}/notes/all", account),
            Endpoint::NoteRead { kind, id } => {
                format!("/students/{}/notes/{}/read/{}", account, kind, id)
            }
            Endpoint::Noticeboard => format!("/students/{}/noticeboard", account),
            Endpoint::NoticeboardRead { code, id } => format!(
                "/students/{}/noticeboard/read/{}/{}/{}",
                account, code, id, NOTICEBOARD_READ_SUFFIX
            ),
            Endpoint::LessonsToday => format!("/students/{}/lessons/today", account),
            Endpoint::LessonsOn { day } => {
                format!("/students/{}/lessons/{}", account, remote_segment(*day))
            }
            Endpoint::Overview { from, to } => format!(
                "/students/{}/overview/all/{}/{}",
                account,
                remote_segment(*from),
                remote_segment(*to)
            ),
            Endpoint::Avatar => format!("/users/{}/avatar", account),
            Endpoint::Card => format!("/students/{}/card", account),
            Endpoint::Schoolbooks => format!("/students/{}/schoolbooks", account),
        }
    }

    /// Translate a documented remote error code into a typed failure.
    ///
    /// Returns `None` when the response carries no code this endpoint knows,
    /// leaving the caller to fall back on [`ApiError::from_status`].
    pub(crate) fn remote_error(&self, status: StatusCode, body: &str) -> Option<ApiError> {
        let code = remote_error_code(body)?;
        match (self, status.as_u16()) {
            (Endpoint::AbsencesFrom { from }, 404) => {
                date_error(&code, format!("{} is outside the school year", from))
            }
            (Endpoint::AbsencesBetween { from, to }, 404)
            | (Endpoint::Agenda { from, to }, 404) => {
                date_error(
                    &code,
                    format!(
                        "{} - {} is outside the school year or starts after it ends",
                        from, to
                    ),
                )
            }
            (Endpoint::NoteRead { id, .. }, 404) if code.starts_with("130") => {
                Some(ApiError::InvalidParameter(format!("note {} not found", id)))
            }
            (Endpoint::NoteRead { kind, .. }, 404) if code.starts_with("102") => {
                Some(ApiError::UnknownCategory(format!("note category {}", kind)))
            }
            (Endpoint::Avatar, 401) if code.starts_with("252") => Some(ApiError::TokenInvalid),
            _ => None,
        }
    }
}

fn date_error(code: &str, range: String) -> Option<ApiError> {
    if code.starts_with("120") {
        Some(ApiError::InvalidDateFormat(code.to_string()))
    } else if code.starts_with("122") {
        Some(ApiError::DateOutOfRange(range))
    } else {
        None
    }
}
