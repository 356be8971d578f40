//! Operations that can be fanned out across a collection.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::api::ApiError;
use crate::models::{
    AbsenceEvent, AgendaEvent, Card, Grade, Lesson, NoticeboardItem, Period, SchoolReport,
    Subject,
};

/// Every data operation an account supports, with its arguments.
/// Dates are `YYYY-MM-DD` strings validated when the operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Ticket,
    Documents,
    CheckDocument { document: String },
    SchoolReports,
    Absences { from: Option<String>, to: Option<String> },
    Agenda { from: Option<String>, to: Option<String> },
    Grades,
    Subjects,
    Periods,
    Notes,
    ReadNote { kind: String, id: u64 },
    Noticeboard,
    ReadNoticeboardItem { code: String, id: u64 },
    Lessons { day: Option<String> },
    Overview { from: Option<String>, to: Option<String> },
    Avatar,
    Card,
    Schoolbook,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Ticket => "ticket",
            Operation::Documents => "documents",
            Operation::CheckDocument { .. } => "check-document",
            Operation::SchoolReports => "school-reports",
            Operation::Absences { .. } => "absences",
            Operation::Agenda { .. } => "agenda",
            Operation::Grades => "grades",
            Operation::Subjects => "subjects",
            Operation::Periods => "periods",
            Operation::Notes => "notes",
            Operation::ReadNote { .. } => "read-note",
            Operation::Noticeboard => "noticeboard",
            Operation::ReadNoticeboardItem { .. } => "read-noticeboard",
            Operation::Lessons { .. } => "lessons",
            Operation::Overview { .. } => "overview",
            Operation::Avatar => "avatar",
            Operation::Card => "card",
            Operation::Schoolbook => "schoolbook",
        }
    }
}

/// Parses the argument-free form of an operation (`"grades"`, `"agenda"`, ...).
/// Operations that need an identifier must be built directly.
impl FromStr for Operation {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let operation = match s.trim().to_ascii_lowercase().as_str() {
            "ticket" => Operation::Ticket,
            "documents" => Operation::Documents,
            "school-reports" | "reports" => Operation::SchoolReports,
            "absences" => Operation::Absences { from: None, to: None },
            "agenda" => Operation::Agenda { from: None, to: None },
            "grades" => Operation::Grades,
            "subjects" => Operation::Subjects,
            "periods" => Operation::Periods,
            "notes" => Operation::Notes,
            "noticeboard" => Operation::Noticeboard,
            "lessons" => Operation::Lessons { day: None },
            "overview" => Operation::Overview { from: None, to: None },
            "avatar" => Operation::Avatar,
            "card" => Operation::Card,
            "schoolbook" | "schoolbooks" => Operation::Schoolbook,
            other => {
                return Err(ApiError::InvalidParameter(format!(
                    "unknown operation '{}'",
                    other
                )))
            }
        };
        Ok(operation)
    }
}

/// Result of [`Operation`] for one account. Serializes as the bare payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Text(String),
    Flag(bool),
    Json(Value),
    SchoolReports(Vec<SchoolReport>),
    Absences(Vec<AbsenceEvent>),
    Agenda(Vec<AgendaEvent>),
    Grades(Vec<Grade>),
    Subjects(Vec<Subject>),
    Periods(Vec<Period>),
    Noticeboard(Vec<NoticeboardItem>),
    Lessons(Vec<Lesson>),
    Avatar(Vec<u8>),
    Card(Card),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation_names() {
        assert_eq!("grades".parse::<Operation>().unwrap(), Operation::Grades);
        assert_eq!(" Agenda ".parse::<Operation>().unwrap().name(), "agenda");
        assert_eq!(
            "lessons".parse::<Operation>().unwrap(),
            Operation::Lessons { day: None }
        );
        assert!(matches!(
            "delete-everything".parse::<Operation>(),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_output_serializes_bare_payload() {
        let output = OperationOutput::Grades(vec![Grade {
            evt_id: 7,
            ..Default::default()
        }]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json[0]["evtId"], 7);

        let json = serde_json::to_value(OperationOutput::Flag(true)).unwrap();
        assert_eq!(json, Value::Bool(true));
    }
}
