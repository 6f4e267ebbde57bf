use super::{DispatchError, Dispatcher, Outcome, TriggerPayload};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Webhook dispatcher over reqwest.
pub struct HttpDispatcher {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpDispatcher {
    /// `timeout` of `None` waits on the remote indefinitely.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            timeout,
        })
    }
}

#[async_trait::async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, endpoint: &str, payload: &TriggerPayload) -> Outcome {
        debug!(%endpoint, workflow = %payload.workflow, "POST webhook");

        match self.client.post(endpoint).json(payload).send().await {
            Ok(resp) => Outcome::from_status(resp.status().as_u16()),
            Err(e) if e.is_timeout() => {
                let ms = self.timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
                warn!(%endpoint, ms, "webhook request timed out");
                Outcome::Failed(DispatchError::Timeout { ms })
            }
            Err(e) => Outcome::Failed(DispatchError::Transport(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_json_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhook/main"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "trigger": "manual",
                "workflow": "main",
                "source": "dashboard"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = HttpDispatcher::new(None).unwrap();
        let url = format!("{}/webhook/main", server.uri());
        let outcome = dispatcher
            .dispatch(&url, &TriggerPayload::manual(WorkflowKind::Main))
            .await;

        assert_eq!(
            outcome,
            Outcome::Responded { status_ok: true, status_code: 200 }
        );
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_response_not_a_fault() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dispatcher = HttpDispatcher::new(None).unwrap();
        let outcome = dispatcher
            .dispatch(&server.uri(), &TriggerPayload::manual(WorkflowKind::SheetsSub))
            .await;

        assert_eq!(
            outcome,
            Outcome::Responded { status_ok: false, status_code: 404 }
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_fault() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatcher = HttpDispatcher::new(None).unwrap();
        let endpoint = format!("http://{}/hook", addr);
        let outcome = dispatcher
            .dispatch(&endpoint, &TriggerPayload::manual(WorkflowKind::Main))
            .await;

        match outcome {
            Outcome::Failed(DispatchError::Transport(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected transport fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let dispatcher = HttpDispatcher::new(Some(Duration::from_millis(200))).unwrap();
        let outcome = dispatcher
            .dispatch(&server.uri(), &TriggerPayload::manual(WorkflowKind::Main))
            .await;

        assert_eq!(outcome, Outcome::Failed(DispatchError::Timeout { ms: 200 }));
    }
}
