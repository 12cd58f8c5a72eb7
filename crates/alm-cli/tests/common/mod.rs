use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT: &str = "/qcbin/rest/domains/QA/projects/Web";

/// Run the CLI binary with a custom HOME for isolated profile storage.
///
/// Connection settings come from the environment, like a CI job would set
/// them; `unset` removes some of them again.
pub async fn run_cli(args: &[&str], home: &Path, server: &str, unset: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_alm"));
    cmd.args(args)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env("ALM_SERVER", server)
        .env("ALM_DOMAIN", "QA")
        .env("ALM_PROJECT", "Web")
        .env("ALM_USERNAME", "bob")
        .env("ALM_PASSWORD", "secret");
    for name in unset {
        cmd.env_remove(name);
    }
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], home: &Path, server: &str) -> String {
    let output = run_cli(args, home, server, &[]).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn profile_path(home: &Path) -> PathBuf {
    home.join("data").join("alm").join("profile.json")
}

/// Mount the probe, authenticate and logout endpoints, each call of the
/// latter two expected the given number of times.
pub async fn mount_session(server: &MockServer, logins: u64, logouts: u64) {
    let realm = format!(r#"X-Realm="{}/qcbin/authentication-point""#, server.uri());

    Mock::given(method("GET"))
        .and(path("/qcbin/rest/is-authenticated"))
        .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", realm.as_str()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/authenticate"))
        .and(header("authorization", "Basic Ym9iOnNlY3JldA=="))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "LWSSO_COOKIE_KEY=k1; Path=/"),
        )
        .expect(logins)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/qcbin/authentication-point/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(logouts)
        .mount(server)
        .await;
}

pub fn entity(kind: &str, fields: &[(&str, &str)]) -> Value {
    let fields: Vec<Value> = fields
        .iter()
        .map(|(name, value)| json!({"Name": name, "values": [{"value": value}]}))
        .collect();
    json!({"Type": kind, "Fields": fields})
}

/// First value of the named field in an entity body.
pub fn field<'a>(entity: &'a Value, name: &str) -> Option<&'a str> {
    entity["Fields"]
        .as_array()?
        .iter()
        .find(|f| f["Name"] == name)?["values"][0]["value"]
        .as_str()
}
