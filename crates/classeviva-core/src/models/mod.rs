//! Data models for Classeviva entities.
//!
//! This module contains the typed shapes of the register's responses:
//!
//! - `Grade`, `Subject`, `Period`: marks and the structure they live in
//! - `AbsenceEvent`, `AgendaEvent`, `Lesson`: calendar-like records
//! - `NoticeboardItem`: school communications
//! - `Profile`, `Card`, `SchoolReport`: who the account belongs to
//!
//! Every field is optional or defaulted so a partial record from the remote
//! never fails deserialization, whether a field is missing or `null`.
//! Free-form payloads (notes, documents, overview) are returned as
//! `serde_json::Value` instead.

use serde::{Deserialize, Deserializer};

pub mod board;
pub mod events;
pub mod grades;
pub mod student;

pub use board::{NoticeboardAttachment, NoticeboardItem};
pub use events::{AbsenceEvent, AbsenceKind, AgendaEvent, Lesson};
pub use grades::{Grade, Period, Subject, Teacher};
pub use student::{Card, LoginResponse, Profile, SchoolReport};

/// Treat an explicit `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_nulls_fall_back_to_defaults() {
        let grade: Grade = serde_json::from_str(
            r#"{"evtId":null,"canceled":null,"underlined":null,"displayValue":"7"}"#,
        )
        .unwrap();
        assert_eq!(grade.evt_id, 0);
        assert!(!grade.canceled);
        assert_eq!(grade.display_value.as_deref(), Some("7"));

        let subject: Subject =
            serde_json::from_str(r#"{"id":5,"description":null,"teachers":null}"#).unwrap();
        assert_eq!(subject.id, 5);
        assert_eq!(subject.description, "");
        assert!(subject.teachers.is_empty());

        let absence: AbsenceEvent =
            serde_json::from_str(r#"{"evtId":1,"evtCode":"ABA0","isJustified":null}"#).unwrap();
        assert!(!absence.is_justified);

        let agenda: AgendaEvent = serde_json::from_str(r#"{"isFullDay":null}"#).unwrap();
        assert!(!agenda.is_full_day);

        let item: NoticeboardItem = serde_json::from_str(
            r#"{"pubId":1,"readStatus":null,"cntHasAttach":null,"attachments":null}"#,
        )
        .unwrap();
        assert!(!item.read_status);
        assert!(item.attachments.is_empty());
    }

    #[test]
    fn test_null_in_one_record_keeps_the_list() {
        let grades: Vec<Grade> = serde_json::from_str(
            r#"[{"evtId":1,"decimalValue":6.0},{"evtId":2,"canceled":null,"decimalValue":null}]"#,
        )
        .unwrap();
        assert_eq!(grades.len(), 2);
        assert!(grades[0].counts_toward_average());
        assert!(!grades[1].counts_toward_average());
    }
}
