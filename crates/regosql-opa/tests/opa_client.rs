//! OpaClient against a canned single-shot HTTP server.

use regosql_domain::engine::{EngineError, EvalContext, FullRequest, PartialRequest, PolicyEngine};
use regosql_domain::{CompileConfig, UnknownCollection, compile_residual};
use regosql_opa::OpaClient;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

/// Serves one request with the given status and body; returns the base URL and a handle
/// yielding the raw request (head + body).
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read line");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().expect("content length");
            }
            head.push_str(&line);
        }
        let mut req_body = vec![0u8; content_length];
        reader.read_exact(&mut req_body).expect("read body");

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush");

        format!("{head}\r\n{}", String::from_utf8_lossy(&req_body))
    });

    (format!("http://{addr}"), handle)
}

fn fixture() -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("compile_response.json");
    std::fs::read_to_string(path).expect("read fixture")
}

#[test]
fn partial_evaluate_posts_compile_request_and_decodes_residual() {
    let (base, server) = serve_once("200 OK", fixture());
    let client = OpaClient::new(&base, Duration::from_secs(5)).expect("client");

    let request = PartialRequest {
        query: "data.example.allow == true".to_string(),
        input: Some(serde_json::json!({"method": "GET"})),
        unknowns: vec!["data.users".to_string()],
    };
    let residual = client
        .partial_evaluate(&EvalContext::background(), &request)
        .expect("partial evaluate");

    let raw = server.join().expect("server thread");
    assert!(raw.starts_with("POST /v1/compile"));
    assert!(raw.contains("\"unknowns\":[\"data.users\"]"));
    assert!(raw.contains("\"method\":\"GET\""));

    let cfg = CompileConfig::new(UnknownCollection::parse("data.users").unwrap());
    let compiled = compile_residual(&residual, &cfg).expect("compile");
    assert_eq!(
        compiled.where_sql(),
        "login = \"bob\" AND password = \"pass\""
    );
}

fn full_evaluate_against(body: &str) -> (bool, String) {
    let (base, server) = serve_once("200 OK", body.to_string());
    let client = OpaClient::new(&base, Duration::from_secs(5)).expect("client");

    let request = FullRequest {
        query: "data.example.allow".to_string(),
        input: Some(serde_json::json!({"method": "GET"})),
    };
    let allowed = client
        .full_evaluate(&EvalContext::background(), &request)
        .expect("full evaluate");
    (allowed, server.join().expect("server thread"))
}

#[test]
fn full_evaluate_is_allowed_when_decision_is_true() {
    let (allowed, raw) = full_evaluate_against(r#"{"result": [{"regosql_decision": true}]}"#);
    assert!(allowed);
    assert!(raw.starts_with("POST /v1/query"));
    assert!(raw.contains(r#""query":"regosql_decision := (data.example.allow)""#));
    assert!(raw.contains("\"method\":\"GET\""));
}

#[test]
fn full_evaluate_is_denied_when_decision_is_false() {
    // A `default allow = false` policy still produces one result.
    let (allowed, _) = full_evaluate_against(r#"{"result": [{"regosql_decision": false}]}"#);
    assert!(!allowed);
}

#[test]
fn full_evaluate_is_denied_when_query_is_undefined() {
    let (base, server) = serve_once("200 OK", "{}".to_string());
    let client = OpaClient::new(&base, Duration::from_secs(5)).expect("client");

    let request = FullRequest {
        query: "data.example.allow".to_string(),
        input: None,
    };
    let allowed = client
        .full_evaluate(&EvalContext::background(), &request)
        .expect("full evaluate");
    assert!(!allowed);
    server.join().expect("server thread");
}

#[test]
fn engine_errors_pass_through_with_status_and_body() {
    let body = r#"{"code": "invalid_parameter", "message": "rego_parse_error"}"#.to_string();
    let (base, server) = serve_once("400 Bad Request", body);
    let client = OpaClient::new(&base, Duration::from_secs(5)).expect("client");

    let request = PartialRequest {
        query: "data.example.allow ==".to_string(),
        input: None,
        unknowns: vec!["data.users".to_string()],
    };
    let err = client
        .partial_evaluate(&EvalContext::background(), &request)
        .unwrap_err();
    match err {
        EngineError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("rego_parse_error"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.join().expect("server thread");
}
