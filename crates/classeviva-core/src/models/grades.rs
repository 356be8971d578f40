use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Grade {
    #[serde(deserialize_with = "super::null_as_default")]
    pub evt_id: i64,
    pub evt_code: Option<String>,
    pub evt_date: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_code: Option<String>,
    pub subject_desc: Option<String>,
    pub decimal_value: Option<f64>,
    pub display_value: Option<String>,
    pub notes_for_family: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub canceled: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub underlined: bool,
    pub period_pos: Option<i64>,
    pub period_desc: Option<String>,
    pub component_desc: Option<String>,
    pub weight_factor: Option<f64>,
}

impl Grade {
    /// Whether this grade carries a numeric value that counts toward averages.
    /// Cancelled grades and purely descriptive ones ("+", "-") do not.
    pub fn counts_toward_average(&self) -> bool {
        !self.canceled && self.decimal_value.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub description: String,
    pub order: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub teachers: Vec<Teacher>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Teacher {
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    pub period_code: Option<String>,
    pub period_pos: Option<i64>,
    pub period_desc: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_final: bool,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub miur_division_code: Option<String>,
}
