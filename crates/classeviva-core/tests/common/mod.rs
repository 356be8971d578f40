//! Shared fixtures for tests that talk to a mock register server.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use classeviva_core::{AccountClient, ApiClient, ClientConfig, Credential, ManualClock};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

pub const API_PREFIX: &str = "/rest/v1";

/// 2024-01-15 10:00 UTC, the instant every mocked login is released at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

pub const RELEASE: &str = "2024-01-15T11:00:00+01:00";

pub fn api_client(server: &ServerGuard) -> ApiClient {
    let config = ClientConfig::with_base_url(format!("{}{}", server.url(), API_PREFIX));
    ApiClient::new(config).expect("client should build")
}

pub fn account(
    server: &ServerGuard,
    clock: &Arc<ManualClock>,
    identifier: &str,
    secret: &str,
) -> AccountClient {
    AccountClient::with_clock(
        Credential::new(identifier, secret),
        api_client(server),
        clock.clone(),
    )
}

pub fn login_body(identifier: &str, token: &str, release: &str) -> String {
    json!({
        "ident": identifier,
        "firstName": "MARIO",
        "lastName": format!("ROSSI-{}", identifier),
        "showPwdChangeReminder": false,
        "token": token,
        "release": release,
        "expire": "2024-01-15T12:30:00+01:00",
    })
    .to_string()
}

/// Login mock answering only for the given identifier.
pub async fn mock_login(
    server: &mut ServerGuard,
    identifier: &str,
    token: &str,
    hits: usize,
) -> Mock {
    server
        .mock("POST", format!("{}/auth/login", API_PREFIX).as_str())
        .match_header("z-dev-apikey", classeviva_core::config::DEFAULT_API_KEY)
        .match_body(Matcher::PartialJson(json!({ "ident": null, "uid": identifier })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(login_body(identifier, token, RELEASE))
        .expect(hits)
        .create_async()
        .await
}

/// Login mock rejecting the password for the given identifier.
pub async fn mock_rejected_login(server: &mut ServerGuard, identifier: &str) -> Mock {
    server
        .mock("POST", format!("{}/auth/login", API_PREFIX).as_str())
        .match_body(Matcher::PartialJson(json!({ "uid": identifier })))
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"statusCode":422,"error":"authentication failed","message":"password mismatch"}"#)
        .expect(1)
        .create_async()
        .await
}

/// Authenticated GET returning a JSON body.
pub async fn mock_get(
    server: &mut ServerGuard,
    path: &str,
    token: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", format!("{}{}", API_PREFIX, path).as_str())
        .match_header("z-auth-token", token)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub fn remote_error(status: u16, code: &str) -> String {
    json!({ "statusCode": status, "error": code, "message": "error" }).to_string()
}

pub const GRADES: &str = r#"{"grades":[{"evtId":1,"evtCode":"GRV0","evtDate":"2024-01-10","subjectDesc":"MATEMATICA","decimalValue":8.5,"displayValue":"8½","canceled":false},{"evtId":2,"evtCode":"GRV0","evtDate":"2024-01-12","subjectDesc":"ITALIANO","decimalValue":null,"displayValue":"+","canceled":false}]}"#;

pub const ABSENCES: &str = r#"{"events":[{"evtId":10,"evtCode":"ABA0","evtDate":"2024-01-08","isJustified":true},{"evtId":11,"evtCode":"ABR0","evtDate":"2024-01-09","evtHPos":2,"isJustified":false}]}"#;
