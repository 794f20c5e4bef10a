//! Integration tests for login/logout/status commands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_logout_when_not_logged_in() {
    let temp = tempdir().unwrap();

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhuma sessão ativa."));
}

#[test]
fn test_logout_removes_session_file() {
    let temp = tempdir().unwrap();
    let session_path = temp.path().join("session.json");
    fs::write(&session_path, r#"{"token": "abc"}"#).unwrap();

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessão encerrada"));

    assert!(!session_path.exists());
}

#[test]
fn test_logout_recovers_from_corrupt_session_file() {
    let temp = tempdir().unwrap();
    let session_path = temp.path().join("session.json");
    fs::write(&session_path, "{not json").unwrap();

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Não autenticado"));

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessão encerrada"));

    assert!(!session_path.exists());
}

#[test]
fn test_status_reports_session() {
    let temp = tempdir().unwrap();

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Não autenticado"));

    fs::write(
        temp.path().join("session.json"),
        r#"{"token": "eyJhbGciOiJIUzI1NiJ9.secret"}"#,
    )
    .unwrap();

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("eyJhbGciOiJI..."))
        .stdout(predicate::str::contains("secret").not());
}

/// Full handshake: request code, verify, then an authenticated dashboard.
#[tokio::test]
async fn test_login_stores_token_and_authenticates_dashboard() {
    let temp = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/request-code"))
        .and(body_json(serde_json::json!({"email": "user@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Código enviado"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-code"))
        .and(body_json(
            serde_json::json!({"email": "user@example.com", "code": "123456"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bikes"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maintenances"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // Non-digits in the code are stripped before submission.
    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .env("T4B_API_URL", server.uri())
        .arg("login")
        .write_stdin("user@example.com\n123-456\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Login realizado"));

    let saved = fs::read_to_string(temp.path().join("session.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["token"], "abc");

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .env("T4B_API_URL", server.uri())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("R$ 0.00"));
}

#[tokio::test]
async fn test_login_invalid_code_then_cancel() {
    let temp = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/request-code"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-code"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .env("T4B_API_URL", server.uri())
        .args(["login", "--email", "user@example.com"])
        .write_stdin("000000\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Código inválido ou expirado"))
        .stdout(predicate::str::contains("Login cancelado."));

    assert!(!temp.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_request_code_error_shows_detail() {
    let temp = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/request-code"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"detail": "Usuário não encontrado"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("t4b")
        .env("T4B_HOME", temp.path())
        .env("T4B_API_URL", server.uri())
        .arg("login")
        .write_stdin("ghost@example.com\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usuário não encontrado"))
        .stdout(predicate::str::contains("Login cancelado."));
}
