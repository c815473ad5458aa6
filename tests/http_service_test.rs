//! HTTP service tests against a one-shot local server

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use kfmd::artifact::{Artifact, Model};
use kfmd::service::{HttpMetadataService, MetadataService};
use kfmd::{Error, Run, Workspace};

struct Captured {
    request_line: String,
    body: serde_json::Value,
}

/// Serve a single request with the given status and body; returns the
/// server address and a receiver for what the client sent.
fn serve_once(status: &'static str, response: &'static str) -> (String, mpsc::Receiver<Captured>) {
    serve_with_length(status, response, response.len())
}

/// Like `serve_once`, but announces `content_length` bytes whatever the
/// body actually holds, then closes the connection.
fn serve_with_length(
    status: &'static str,
    response: &'static str,
    content_length: usize,
) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut request_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                request_length = value.trim().parse().unwrap();
            }
        }

        let mut body = vec![0; request_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n{response}"
        )
        .unwrap();
        stream.flush().unwrap();

        tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            body: serde_json::from_slice(&body).unwrap(),
        })
        .unwrap();
    });

    (addr, rx)
}

#[test]
fn test_http_create_artifact_request_shape() {
    let (addr, rx) = serve_once("200 OK", r#"{"artifact": {"id": "7", "uri": "gs://bucket/model"}}"#);
    let workspace = Workspace::new(addr, "ws1").unwrap();
    let run = Run::new(&workspace, "run-1");

    let mut model = Model::builder("m1", "gs://bucket/model").model_type("tf").build();
    run.log(&mut model).unwrap();
    assert_eq!(model.id(), Some("7"));

    let captured = rx.recv().unwrap();
    assert_eq!(
        captured.request_line,
        "POST /api/v1alpha1/artifact_types/kubeflow.org/alpha/model/artifacts HTTP/1.1"
    );
    assert_eq!(captured.body["uri"], "gs://bucket/model");
    assert_eq!(captured.body["properties"]["model_type"]["string_value"], "tf");
    assert_eq!(
        captured.body["custom_properties"]["__kf_workspace__"]["string_value"],
        "ws1"
    );
    assert_eq!(
        captured.body["custom_properties"]["__kf_run__"]["string_value"],
        "run-1"
    );
    assert!(captured.body.get("id").is_none());
}

#[test]
fn test_http_error_status_is_service_error() {
    let (addr, _rx) = serve_once("400 Bad Request", r#"{"error": "bad artifact type"}"#);
    let service = HttpMetadataService::new(&addr).unwrap();
    let body = Model::new("m1", "u").serialization().unwrap();

    let err = service
        .create_artifact(Model::ARTIFACT_TYPE_NAME, &body)
        .unwrap_err();
    match err {
        Error::Service { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("bad artifact type"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_http_truncated_error_body_is_reported() {
    let (addr, _rx) = serve_with_length("500 Internal Server Error", r#"{"error": "#, 4096);
    let service = HttpMetadataService::new(&addr).unwrap();
    let body = Model::new("m1", "u").serialization().unwrap();

    let err = service
        .create_artifact(Model::ARTIFACT_TYPE_NAME, &body)
        .unwrap_err();
    match err {
        Error::Service { status, body } => {
            assert_eq!(status, 500);
            assert!(body.starts_with("<unreadable body: "), "body: {body}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_http_unparseable_response_is_malformed() {
    let (addr, _rx) = serve_once("200 OK", "not json");
    let workspace = Workspace::builder(addr.clone(), "ws1")
        .service(Arc::new(HttpMetadataService::new(&addr).unwrap()))
        .build()
        .unwrap();
    let run = Run::new(&workspace, "run-1");
    let mut model = Model::new("m1", "u");

    let err = run.log(&mut model).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert!(model.id().is_none());
}

#[test]
fn test_http_connection_refused_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let service = HttpMetadataService::new(&addr).unwrap();
    let body = Model::new("m1", "u").serialization().unwrap();

    let err = service
        .create_artifact(Model::ARTIFACT_TYPE_NAME, &body)
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
