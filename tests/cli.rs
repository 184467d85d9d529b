//! Integration tests for top-level CLI behavior.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};

use serde_json::{json, Value};

const ADMIN_MESSAGE: &str =
    "Unable to validate date fields. Please contact your Jira administrator.";

/// Runs the binary in a scratch directory with no `DATEGUARD_*` variables
/// inherited, feeding `stdin`.
fn run_dateguard(args: &[&str], envs: &[(&str, &str)], stdin: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_dateguard");
    let scratch = std::env::temp_dir().join("dateguard_cli_scratch");
    std::fs::create_dir_all(&scratch).unwrap();

    let mut command = Command::new(bin);
    command
        .args(args)
        .current_dir(&scratch)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (name, _) in std::env::vars().filter(|(name, _)| name.starts_with("DATEGUARD_")) {
        command.env_remove(name);
    }
    command.envs(envs.iter().copied());

    let mut child = command.spawn().expect("failed to run dateguard binary");
    // The child may exit without reading stdin (e.g. --help).
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn response(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("bad stdout {stdout:?}: {e}"))
}

/// Serves one canned JSON response on a local port; returns the base URL and
/// a handle yielding the request head.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let reply = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(reply.as_bytes()).unwrap();
        String::from_utf8_lossy(&head).into_owned()
    });

    (url, handle)
}

#[test]
fn check_help_prints_usage_to_stdout() {
    let output = run_dateguard(&["check", "--help"], &[], "");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--issue"));
    assert!(stdout.contains("--start-date-field"));
}

#[test]
fn version_prints_to_stdout() {
    let output = run_dateguard(&["--version"], &[], "");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("dateguard"));
}

#[test]
fn missing_site_url_blocks_with_admin_message() {
    let output = run_dateguard(&["check", "--issue", "PROJ-1"], &[], "");
    assert!(output.status.success());
    assert_eq!(response(&output), json!({"result": false, "errorMessage": ADMIN_MESSAGE}));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DATEGUARD_SITE_URL"));
}

#[test]
fn invalid_stdin_payload_blocks() {
    let output = run_dateguard(
        &["check"],
        &[("DATEGUARD_SITE_URL", "http://127.0.0.1:9")],
        r#"{"issue":"#,
    );
    assert!(output.status.success());
    assert_eq!(response(&output), json!({"result": false, "errorMessage": ADMIN_MESSAGE}));
}

#[test]
fn both_dates_set_allows_transition() {
    let (site, server) = serve_once(
        "200 OK",
        r#"{"fields":{"duedate":"2024-02-01","startdate":"2024-01-01"}}"#,
    );
    let output =
        run_dateguard(&["check", "--site", site.as_str()], &[], r#"{"issue":{"key":"PROJ-2"}}"#);

    assert!(output.status.success());
    assert_eq!(response(&output), json!({"result": true}));
    let head = server.join().unwrap();
    assert!(head.starts_with("GET /rest/api/3/issue/PROJ-2?fields=duedate,startdate "));
}

#[test]
fn missing_due_date_is_named() {
    let (site, server) =
        serve_once("200 OK", r#"{"fields":{"duedate":null,"startdate":"2024-01-01"}}"#);
    let output = run_dateguard(
        &["check", "--issue", "PROJ-1"],
        &[
            ("DATEGUARD_SITE_URL", site.as_str()),
            ("DATEGUARD_EMAIL", "bot@acme.example"),
            ("DATEGUARD_API_TOKEN", "t0k"),
        ],
        "",
    );

    assert_eq!(
        response(&output),
        json!({
            "result": false,
            "errorMessage": "Due Date must be set before transitioning this issue."
        })
    );
    let head = server.join().unwrap();
    assert!(head.to_lowercase().contains("authorization: basic "));
}

#[test]
fn server_error_blocks_with_admin_message() {
    let (site, server) = serve_once("500 Internal Server Error", r#"{"errorMessages":[]}"#);
    let output = run_dateguard(
        &["check", "--issue", "PROJ-1", "--start-date-field", "customfield_10015"],
        &[("DATEGUARD_SITE_URL", site.as_str())],
        "",
    );

    assert_eq!(response(&output), json!({"result": false, "errorMessage": ADMIN_MESSAGE}));
    let head = server.join().unwrap();
    assert!(head.contains("fields=duedate,customfield_10015"));
}
