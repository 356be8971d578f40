use serde::{Deserialize, Serialize};

/// Kind of an absence event, decoded from its event code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceKind {
    Absence,
    Late,
    ShortLate,
    EarlyExit,
    Other,
}

impl std::fmt::Display for AbsenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsenceKind::Absence => write!(f, "Absence"),
            AbsenceKind::Late => write!(f, "Late entry"),
            AbsenceKind::ShortLate => write!(f, "Short delay"),
            AbsenceKind::EarlyExit => write!(f, "Early exit"),
            AbsenceKind::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbsenceEvent {
    #[serde(deserialize_with = "super::null_as_default")]
    pub evt_id: i64,
    pub evt_code: Option<String>,
    pub evt_date: Option<String>,
    pub evt_h_pos: Option<i64>,
    pub evt_value: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_justified: bool,
    pub justif_reason_code: Option<String>,
    pub justif_reason_desc: Option<String>,
}

impl AbsenceEvent {
    pub fn kind(&self) -> AbsenceKind {
        match self.evt_code.as_deref() {
            Some("ABA0") => AbsenceKind::Absence,
            Some("ABR0") => AbsenceKind::Late,
            Some("ABR1") => AbsenceKind::ShortLate,
            Some("ABU0") => AbsenceKind::EarlyExit,
            _ => AbsenceKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgendaEvent {
    #[serde(deserialize_with = "super::null_as_default")]
    pub evt_id: i64,
    pub evt_code: Option<String>,
    pub evt_datetime_begin: Option<String>,
    pub evt_datetime_end: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_full_day: bool,
    pub notes: Option<String>,
    pub author_name: Option<String>,
    pub class_desc: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_desc: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lesson {
    #[serde(deserialize_with = "super::null_as_default")]
    pub evt_id: i64,
    pub evt_date: Option<String>,
    pub evt_code: Option<String>,
    pub evt_h_pos: Option<i64>,
    pub evt_duration: Option<i64>,
    pub class_desc: Option<String>,
    pub author_name: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_code: Option<String>,
    pub subject_desc: Option<String>,
    pub lesson_type: Option<String>,
    pub lesson_arg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absence_kind_from_code() {
        let event = |code: &str| AbsenceEvent {
            evt_code: Some(code.to_string()),
            ..Default::default()
        };
        assert_eq!(event("ABA0").kind(), AbsenceKind::Absence);
        assert_eq!(event("ABR0").kind(), AbsenceKind::Late);
        assert_eq!(event("ABR1").kind(), AbsenceKind::ShortLate);
        assert_eq!(event("ABU0").kind(), AbsenceKind::EarlyExit);
        assert_eq!(event("ZZZZ").kind(), AbsenceKind::Other);
        assert_eq!(AbsenceEvent::default().kind(), AbsenceKind::Other);
    }

    #[test]
    fn test_parse_absence_event() {
        let json = r#"{"evtId":55,"evtCode":"ABA0","evtDate":"2024-11-04","evtHPos":null,"evtValue":null,"isJustified":true,"justifReasonCode":"A","justifReasonDesc":"Motivi di salute","hoursAbsence":[]}"#;
        let event: AbsenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.evt_id, 55);
        assert!(event.is_justified);
        assert_eq!(event.kind().to_string(), "Absence");
    }

    #[test]
    fn test_parse_lesson() {
        let json = r#"{"evtId":9,"evtDate":"2024-11-04","evtCode":"LSF0","evtHPos":2,"evtDuration":1,"classDesc":"3A","authorName":"ROSSI MARIO","subjectId":1,"subjectCode":"MAT","subjectDesc":"MATEMATICA","lessonType":"Lezione","lessonArg":"Equazioni"}"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.evt_h_pos, Some(2));
        assert_eq!(lesson.lesson_arg.as_deref(), Some("Equazioni"));
    }
}
