//! Topic lifecycle through `ApiClient` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives it over real HTTP with
//! two transports: the bundled `ReqwestTransport`, and a blocking ureq agent
//! wrapped in `spawn_blocking`. Both must yield identical envelopes.

use std::io::{Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use console_api_core::{
    ApiClient, ClientConfig, ErrorMessage, HttpMethod, HttpResponse, RequestConfig, ReqwestTransport,
    ResultEnvelope, Transport, TransportError, NETWORK_ERROR, TIMEOUT_ERROR,
};
use mock_server::Topic;
use serde_json::json;

/// Blocking transport built on ureq.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses are
/// returned as data.
#[derive(Clone)]
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: RequestConfig) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|_| TransportError::Aborted)?
    }
}

fn with_parts<B>(mut builder: ureq::RequestBuilder<B>, req: &RequestConfig) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in &req.query {
        builder = builder.query(name, value);
    }
    builder
}

fn execute_blocking(
    agent: &ureq::Agent,
    req: RequestConfig,
) -> Result<HttpResponse, TransportError> {
    let url = req.url.as_str();
    let body = req.body.as_deref().unwrap_or_default();
    let result = match req.method {
        HttpMethod::Get => with_parts(agent.get(url), &req).call(),
        HttpMethod::Delete => with_parts(agent.delete(url), &req).call(),
        HttpMethod::Head => with_parts(agent.head(url), &req).call(),
        HttpMethod::Options => with_parts(agent.options(url), &req).call(),
        HttpMethod::Post => with_parts(agent.post(url), &req).send(body.as_bytes()),
        HttpMethod::Put => with_parts(agent.put(url), &req).send(body.as_bytes()),
        HttpMethod::Patch => with_parts(agent.patch(url), &req).send(body.as_bytes()),
    };

    let mut response = result.map_err(|e| match e {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Unreachable(other.to_string()),
    })?;

    let status = response.status();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::Io(e.to_string()))?;

    Ok(HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers: Vec::new(),
        body,
    })
}

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/v0")
}

/// Serve one connection with a fixed raw reply, then close it.
fn reply_once(raw: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(raw).unwrap();
    });
    addr
}

async fn topic_lifecycle<T: Transport>(client: ApiClient<T>) {
    // Step 1: list is empty.
    let env = client.get("/topics").await;
    assert_eq!(env, ResultEnvelope::success(json!([])));

    // Step 2: create without a content type; the injected header lets the
    // server accept the JSON body.
    let created: Topic = client
        .post("/topics", &json!({"name": "logs", "numberOfPartitions": 2}))
        .await
        .decode()
        .unwrap();
    assert_eq!(created.name, "logs");
    assert_eq!(created.number_of_partitions, 2);

    // Step 2b: query pairs reach the server.
    client.post("/topics", &json!({"name": "metrics"})).await;
    let config = RequestConfig::new(HttpMethod::Get, client.url("/topics")).query("name", "logs");
    let filtered: Vec<Topic> = client.request(&config).await.decode().unwrap();
    assert_eq!(filtered, vec![created.clone()]);

    // Step 3: an explicit content type is sent as given, so the server
    // refuses it with a plain-text body and the status text is used.
    let config = RequestConfig::new(HttpMethod::Post, client.url("/topics"))
        .header("Content-Type", "text/plain")
        .body(r#"{"name":"other"}"#);
    let env = client.request(&config).await;
    assert_eq!(env, ResultEnvelope::failure("Unsupported Media Type"));

    // Step 4: duplicate create surfaces the server's message.
    let env = client.post("/topics", &json!({"name": "logs"})).await;
    assert_eq!(env, ResultEnvelope::failure("topic logs already exists"));

    // Step 5: partial update through PATCH.
    let updated: Topic = client
        .patch("/topics/logs", &json!({"numberOfReplications": 3}))
        .await
        .decode()
        .unwrap();
    assert_eq!(updated.number_of_partitions, 2);
    assert_eq!(updated.number_of_replications, 3);

    // Step 6: full update through PUT.
    let updated: Topic = client
        .put("/topics/logs", &json!({"numberOfPartitions": 5}))
        .await
        .decode()
        .unwrap();
    assert_eq!(updated.number_of_partitions, 5);

    // Step 7: get returns the stored topic.
    let fetched: Topic = client.get("/topics/logs").await.decode().unwrap();
    assert_eq!(fetched, updated);

    // Step 8: error body without `message` falls back to the status text.
    let env = client.get("/maintenance").await;
    assert_eq!(env, ResultEnvelope::failure("Service Unavailable"));

    // Step 9: delete; an empty 204 body is a null result.
    let env = client.delete("/topics/logs").await;
    assert_eq!(env, ResultEnvelope::success(serde_json::Value::Null));

    // Step 10: get after delete.
    let env = client.get("/topics/logs").await;
    assert_eq!(
        env.error_message(),
        Some(&ErrorMessage::Text("topic logs does not exist".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_over_reqwest() {
    let base_url = start_server().await;
    topic_lifecycle(ApiClient::new(&base_url, ReqwestTransport::new().unwrap())).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_over_ureq() {
    let base_url = start_server().await;
    topic_lifecycle(ApiClient::new(&base_url, UreqTransport::new())).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_port_is_network_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = ApiClient::new(&format!("http://{addr}/v0"), ReqwestTransport::new().unwrap());
    let env = client.get("/topics").await;
    assert_eq!(env, ResultEnvelope::failure(NETWORK_ERROR));
}

#[tokio::test(flavor = "multi_thread")]
async fn silent_server_times_out() {
    // Accepts connections through the backlog but never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = ApiClient::new(&format!("http://{addr}/v0"), ReqwestTransport::new().unwrap());

    let config = RequestConfig::new(HttpMethod::Get, client.url("/topics"))
        .timeout(Duration::from_millis(200));
    let env = client.request(&config).await;
    assert_eq!(env, ResultEnvelope::failure(TIMEOUT_ERROR));
    drop(listener);
}

#[tokio::test(flavor = "multi_thread")]
async fn client_from_config() {
    let base_url = start_server().await;
    let client = ApiClient::from_config(&ClientConfig {
        base_url,
        timeout: Some(Duration::from_secs(5)),
    })
    .unwrap();
    let env = client.get("/topics").await;
    assert_eq!(env, ResultEnvelope::success(json!([])));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_from_config_applies_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = ApiClient::from_config(&ClientConfig {
        base_url: format!("http://{addr}/v0"),
        timeout: Some(Duration::from_millis(200)),
    })
    .unwrap();
    let env = client.get("/topics").await;
    assert_eq!(env, ResultEnvelope::failure(TIMEOUT_ERROR));
    drop(listener);
}

#[tokio::test(flavor = "multi_thread")]
async fn truncated_error_body_uses_status_text() {
    let addr = reply_once(
        b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort!",
    );
    let client = ApiClient::new(&format!("http://{addr}"), ReqwestTransport::new().unwrap());
    let env = client.get("/x").await;
    assert_eq!(env, ResultEnvelope::failure("Internal Server Error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn truncated_success_body_is_network_error() {
    let addr = reply_once(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"id\":");
    let client = ApiClient::new(&format!("http://{addr}"), ReqwestTransport::new().unwrap());
    let env = client.get("/x").await;
    assert_eq!(env, ResultEnvelope::failure(NETWORK_ERROR));
}

#[tokio::test(flavor = "multi_thread")]
async fn server_reason_phrase_is_status_text() {
    let addr = reply_once(b"HTTP/1.1 409 Topic Locked\r\nContent-Length: 0\r\n\r\n");
    let client = ApiClient::new(&format!("http://{addr}"), ReqwestTransport::new().unwrap());
    let env = client.get("/x").await;
    assert_eq!(env, ResultEnvelope::failure("Topic Locked"));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_ascii_header_value_is_kept() {
    let addr = reply_once(
        "HTTP/1.1 200 OK\r\nX-Topic: caf\u{e9}\r\nContent-Length: 2\r\n\r\n{}".as_bytes(),
    );
    let response = ReqwestTransport::new()
        .unwrap()
        .execute(RequestConfig::new(HttpMethod::Get, format!("http://{addr}/x")))
        .await
        .unwrap();
    assert_eq!(response.header_value("x-topic"), Some("caf\u{e9}"));
}
