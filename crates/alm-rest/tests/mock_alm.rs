//! Mock ALM server tests.
//!
//! These tests use wiremock to simulate an ALM server and exercise the
//! session handshake and entity calls through the real HTTP connector.

use alm_core::error::{Error, ProtocolError};
use alm_core::{
    AlmClient, AuthStatus, Credentials, LoginOutcome, Run, RunStep, ServerUrl, SessionEstablisher,
};
use alm_rest::RestConnector;
use serde_json::{Value, json};
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "/qcbin/rest/domains/QA/projects/Web";

fn connector(server: &MockServer) -> RestConnector {
    let url = ServerUrl::new(server.uri()).unwrap();
    RestConnector::builder(url)
        .domain("QA")
        .project("Web")
        .build()
        .unwrap()
}

fn entity(kind: &str, fields: &[(&str, &str)]) -> Value {
    let fields: Vec<Value> = fields
        .iter()
        .map(|(name, value)| json!({"Name": name, "values": [{"value": value}]}))
        .collect();
    json!({"Type": kind, "Fields": fields})
}

fn challenge(realm: &str) -> ResponseTemplate {
    ResponseTemplate::new(401).insert_header("WWW-Authenticate", realm)
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_probe_authenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionEstablisher::new(connector(&server));
    let status = session.probe().await.unwrap();

    assert_eq!(status, AuthStatus::Authenticated);
}

#[tokio::test]
async fn test_probe_challenge() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(challenge(
            r#"Basic realm="http://host/qcbin/authentication-point""#,
        ))
        .mount(&server)
        .await;

    let session = SessionEstablisher::new(connector(&server));

    match session.probe().await.unwrap() {
        AuthStatus::Challenged(point) => assert_eq!(
            point.as_str(),
            "http://host/qcbin/authentication-point/authenticate"
        ),
        other => panic!("expected challenge, got {:?}", other),
    }
}

#[tokio::test]
async fn test_probe_401_without_challenge() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = SessionEstablisher::new(connector(&server))
        .probe()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::InvalidAuthenticationPoint)
    ));
}

#[tokio::test]
async fn test_probe_server_error_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = SessionEstablisher::new(connector(&server))
        .probe()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_login_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(challenge(
            r#"X-Realm="https://alm.example.com/qcbin/authentication-point""#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/authenticate"))
        .and(header("authorization", "Basic Ym9iOnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionEstablisher::new(connector(&server));
    let outcome = session
        .login(&Credentials::new("bob", "secret"))
        .await
        .unwrap();

    assert_eq!(outcome, LoginOutcome::LoggedIn);
}

#[tokio::test]
async fn test_login_already_authenticated_is_noop() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/authenticate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = SessionEstablisher::new(connector(&server))
        .login(&Credentials::new("bob", "secret"))
        .await
        .unwrap();

    assert_eq!(outcome, LoginOutcome::AlreadyAuthenticated);
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(challenge(
            r#"LWSSO realm="http://alm/qcbin/authentication-point""#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authentication failed"))
        .mount(&server)
        .await;

    let err = SessionEstablisher::new(connector(&server))
        .login(&Credentials::new("bob", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_session_cookie_is_replayed_and_cleared_on_logout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/authenticate"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "LWSSO_COOKIE_KEY=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionEstablisher::new(connector(&server));
    session
        .login_at(
            "/qcbin/authentication-point/authenticate",
            &Credentials::new("bob", "secret"),
        )
        .await
        .unwrap();
    session.probe().await.unwrap();
    session.logout().await.unwrap();
    session.probe().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let probes: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/qcbin/rest/is-authenticated")
        .collect();
    assert_eq!(probes.len(), 2);

    let cookie = |i: usize| {
        probes[i]
            .headers
            .get("cookie")
            .map(|v| v.to_str().unwrap().to_string())
    };
    assert_eq!(cookie(0).as_deref(), Some("LWSSO_COOKIE_KEY=abc123"));
    assert_eq!(cookie(1), None);
}

// ============================================================================
// Entity Tests
// ============================================================================

#[tokio::test]
async fn test_read_test() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/tests/17", PROJECT)))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(entity("test", &[("id", "17"), ("name", "Login works")])),
        )
        .mount(&server)
        .await;

    let client = AlmClient::new(connector(&server));
    let test = client.read_test("17").await.unwrap();

    assert_eq!(test.id(), Some("17"));
    assert_eq!(test.name(), Some("Login works"));
}

#[tokio::test]
async fn test_read_missing_entity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/test-sets/999", PROJECT)))
        .respond_with(ResponseTemplate::new(404).set_body_string("Entity not found"))
        .mount(&server)
        .await;

    let err = AlmClient::new(connector(&server))
        .read_test_set("999")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(!err.is_auth_failure());
}

#[tokio::test]
async fn test_read_test_instances_of_test_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/test-instances", PROJECT)))
        .and(query_param("query", "{cycle-id[4]}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [
                entity("test-instance", &[("id", "301"), ("cycle-id", "4"), ("test-id", "17")]),
                entity("test-instance", &[("id", "302"), ("cycle-id", "4"), ("test-id", "18")])
            ],
            "TotalResults": 2
        })))
        .mount(&server)
        .await;

    let instances = AlmClient::new(connector(&server))
        .read_test_instances("4")
        .await
        .unwrap();

    assert_eq!(instances.total_results, 2);
    let tests: Vec<_> = instances.iter().filter_map(|i| i.test_id()).collect();
    assert_eq!(tests, ["17", "18"]);
}

#[tokio::test]
async fn test_create_and_update_run() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/runs", PROJECT)))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(entity(
            "run",
            &[("id", "12"), ("name", "Run_1"), ("status", "Not Completed")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/runs/12", PROJECT)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(entity("run", &[("id", "12"), ("status", "Passed")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AlmClient::new(connector(&server));
    let mut run = client
        .create_run(&Run::new().with_field("name", "Run_1"))
        .await
        .unwrap();
    run.set_status("Passed");

    let updated = client.update_run(run).await.unwrap();
    assert_eq!(updated.status(), Some("Passed"));

    let requests = server.received_requests().await.unwrap();
    let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    let names: Vec<_> = body["Fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["Name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"id"));
    assert!(names.contains(&"status"));
}

#[tokio::test]
async fn test_run_steps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/runs/12/run-steps", PROJECT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [entity("run-step", &[("id", "55"), ("parent-id", "12")])],
            "TotalResults": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/runs/12/run-steps/55", PROJECT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(entity(
            "run-step",
            &[("id", "55"), ("parent-id", "12"), ("status", "Failed")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = AlmClient::new(connector(&server));
    let steps = client.read_run_steps("12").await.unwrap();
    let mut step: RunStep = steps.into_iter().next().unwrap();
    step.set_status("Failed");

    let updated = client.update_run_step(step).await.unwrap();
    assert_eq!(updated.status(), Some("Failed"));
}

#[tokio::test]
async fn test_upload_run_attachment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/runs/12/attachments", PROJECT)))
        .and(header("slug", "console.log"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(b"line 1\nline 2\n".to_vec()))
        .respond_with(ResponseTemplate::new(201).set_body_json(entity(
            "attachment",
            &[("name", "console.log"), ("file-size", "14")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let attachment = AlmClient::new(connector(&server))
        .create_run_attachment("12", "console.log", b"line 1\nline 2\n".to_vec())
        .await
        .unwrap();

    assert_eq!(attachment.name(), Some("console.log"));
    assert_eq!(attachment.file_size(), Some(14));
}

#[tokio::test]
async fn test_html_body_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/runs/12", PROJECT)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Login</html>"))
        .mount(&server)
        .await;

    let err = AlmClient::new(connector(&server))
        .read_run("12")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::UnexpectedBody { .. })
    ));
}
