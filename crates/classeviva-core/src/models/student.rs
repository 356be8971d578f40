use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Minimal identity of an authenticated account, cached from the login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub ident: String,
    pub first_name: String,
    pub last_name: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub release: DateTime<FixedOffset>,
    pub expire: DateTime<FixedOffset>,
    #[serde(default)]
    pub ident: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl LoginResponse {
    /// Profile from the login response; `None` unless all three fields are non-empty.
    pub fn profile(&self) -> Option<Profile> {
        let field = |value: &Option<String>| value.as_ref().filter(|v| !v.is_empty()).cloned();
        Some(Profile {
            ident: field(&self.ident)?,
            first_name: field(&self.first_name)?,
            last_name: field(&self.last_name)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    pub ident: Option<String>,
    pub usr_type: Option<String>,
    pub usr_id: Option<i64>,
    pub miur_school_code: Option<String>,
    pub miur_division_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub fiscal_code: Option<String>,
    pub sch_code: Option<String>,
    pub sch_name: Option<String>,
    pub sch_dedication: Option<String>,
    pub sch_city: Option<String>,
    pub sch_prov: Option<String>,
}

/// A report card published in the documents area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolReport {
    pub desc: Option<String>,
    pub confirm_link: Option<String>,
    pub view_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &str = r#"{"ident":"S1234567","firstName":"MARIO","lastName":"ROSSI","showPwdChangeReminder":false,"token":"abc123","release":"2024-01-15T11:00:00+01:00","expire":"2024-01-15T12:30:00+01:00"}"#;

    #[test]
    fn test_parse_login_response() {
        let login: LoginResponse = serde_json::from_str(LOGIN).unwrap();
        assert_eq!(login.token, "abc123");
        assert_eq!((login.expire - login.release).num_seconds(), 5400);

        let profile = login.profile().expect("complete profile");
        assert_eq!(profile.ident, "S1234567");
        assert_eq!(profile.full_name(), "MARIO ROSSI");
    }

    #[test]
    fn test_profile_requires_all_fields() {
        let mut login: LoginResponse = serde_json::from_str(LOGIN).unwrap();
        login.last_name = None;
        assert!(login.profile().is_none());

        login.last_name = Some(String::new());
        assert!(login.profile().is_none());
    }
}
