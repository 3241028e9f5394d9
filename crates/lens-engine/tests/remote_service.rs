//! `RemoteEngine` against a throwaway local HTTP server.

use std::time::Duration;

use lens_core::engine::AnalysisEngine;
use lens_core::enums::{EngineErrorKind, Verdict};
use lens_engine::remote::RemoteEngine;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const VALID_BODY: &str = r#"{
    "source_text": "Sample article A",
    "verdict": "REAL",
    "score": 0.91,
    "reasoning": ["neutral", "consistent", "no manipulation"],
    "reasoning_traces": {"tone": "neutral", "consistency": "consistent", "manipulation": "no manipulation"}
}"#;

/// Read one full HTTP request (headers plus `Content-Length` body).
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve a single canned response and hand back the request that was received.
async fn serve_once(
    status_line: &'static str,
    extra_headers: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/v1/analyze", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\n{extra_headers}content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request
    });
    (url, handle)
}

fn engine(url: &str, api_key: Option<&str>, timeout: Duration) -> RemoteEngine {
    RemoteEngine::new(url, api_key, 0.5, timeout).unwrap()
}

#[tokio::test]
async fn valid_response_becomes_result() {
    let (url, server) = serve_once("200 OK", "", VALID_BODY).await;
    let engine = engine(&url, Some("secret-token"), Duration::from_secs(5));

    let result = engine.analyze("Sample article A").await.unwrap();
    assert_eq!(result.verdict, Verdict::Real);
    assert!((result.score - 0.91).abs() < 1e-9);
    assert_eq!(result.reasoning.len(), 3);
    assert_eq!(result.engine, "remote");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/v1/analyze"));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("authorization: bearer secret-token")
    );
    assert!(request.contains(r#"{"text":"Sample article A"}"#));
}

#[tokio::test]
async fn inconsistent_verdict_is_invalid_response() {
    let body = r#"{
        "source_text": "t",
        "verdict": "REAL",
        "score": 0.1,
        "reasoning": ["a", "b", "c"],
        "reasoning_traces": {"tone": "a", "consistency": "b", "manipulation": "c"}
    }"#;
    let (url, _server) = serve_once("200 OK", "", body).await;
    let err = engine(&url, None, Duration::from_secs(5))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::InvalidResponse);
}

#[tokio::test]
async fn result_keeps_submitted_text_over_echoed_text() {
    let body = r#"{
        "source_text": "an entirely different article",
        "verdict": "REAL",
        "score": 0.91,
        "reasoning": ["neutral", "consistent", "no manipulation"],
        "reasoning_traces": {"tone": "neutral", "consistency": "consistent", "manipulation": "no manipulation"}
    }"#;
    let (url, _server) = serve_once("200 OK", "", body).await;

    let result = engine(&url, None, Duration::from_secs(5))
        .analyze("Sample article A")
        .await
        .unwrap();
    assert_eq!(result.source_text, "Sample article A");
}

#[tokio::test]
async fn reasoning_not_matching_traces_is_invalid_response() {
    let body = r#"{
        "source_text": "t",
        "verdict": "REAL",
        "score": 0.91,
        "reasoning": ["fabricated line", "consistent", "no manipulation"],
        "reasoning_traces": {"tone": "neutral", "consistency": "consistent", "manipulation": "no manipulation"}
    }"#;
    let (url, _server) = serve_once("200 OK", "", body).await;
    let err = engine(&url, None, Duration::from_secs(5))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::InvalidResponse);
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let (url, _server) = serve_once("200 OK", "", r#"{"credibility_score": 70}"#).await;
    let err = engine(&url, None, Duration::from_secs(5))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::InvalidResponse);
}

#[tokio::test]
async fn rate_limit_is_unavailable_with_retry_after() {
    let (url, _server) = serve_once("429 Too Many Requests", "retry-after: 17\r\n", "").await;
    let err = engine(&url, None, Duration::from_secs(5))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::Unavailable);
    assert!(err.to_string().contains("17s"));
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let (url, _server) = serve_once(
        "503 Service Unavailable",
        "",
        r#"{"success": false, "error": "Analyzer not initialized"}"#,
    )
    .await;
    let err = engine(&url, None, Duration::from_secs(5))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::Unavailable);
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/v1/analyze", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(stream);
    });

    let err = engine(&url, None, Duration::from_millis(200))
        .analyze("t")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), EngineErrorKind::Timeout);
}
