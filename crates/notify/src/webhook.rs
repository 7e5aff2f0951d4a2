//! HTTP callback notifier.
//!
//! Delivers the completion payload as JSON to a single configured URL.
//! One request per call; no retries.

use std::time::Duration;

use crate::traits::{CallbackPayload, Notifier, NotifyError};

/// Posts callback payloads as JSON to a configured endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    /// Target URL, validated at construction.
    url: reqwest::Url,
    /// Shared HTTP client (connection pooling, request timeout).
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`, giving up on a request after `timeout`.
    ///
    /// Unparseable URLs and non-HTTP schemes produce [`NotifyError::Config`].
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| NotifyError::Config(format!("invalid callback URL {url:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NotifyError::Config(format!(
                "unsupported callback URL scheme: {}",
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &CallbackPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                body = %body,
                "callback receiver returned non-2xx status"
            );
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            task_id = %payload.task_id,
            url = %self.url,
            %status,
            "callback delivered"
        );

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use pooltask_core::TaskId;
    use tokio::sync::mpsc;

    use super::*;

    /// Spawn a receiver on an ephemeral port that answers with `status`
    /// and forwards every decoded payload to the returned channel.
    async fn spawn_receiver(status: StatusCode) -> (SocketAddr, mpsc::UnboundedReceiver<CallbackPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/callback",
            post(move |Json(payload): Json<CallbackPayload>| {
                let tx = tx.clone();
                async move {
                    tx.send(payload).ok();
                    (status, "received")
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        (addr, rx)
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = WebhookNotifier::new("not a url", Duration::from_secs(1)).unwrap_err();
        match err {
            NotifyError::Config(msg) => assert!(msg.contains("invalid callback URL")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = WebhookNotifier::new("ftp://example.com/cb", Duration::from_secs(1)).unwrap_err();
        match err {
            NotifyError::Config(msg) => assert!(msg.contains("ftp")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn channel_name_is_webhook() {
        let notifier = WebhookNotifier::new("http://localhost:8080/callback", Duration::from_secs(1)).unwrap();
        assert_eq!(notifier.channel_name(), "webhook");
        assert_eq!(notifier.url(), "http://localhost:8080/callback");
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let (addr, mut rx) = spawn_receiver(StatusCode::OK).await;
        let notifier = WebhookNotifier::new(&format!("http://{addr}/callback"), Duration::from_secs(5)).unwrap();

        let payload = CallbackPayload::new(TaskId::from("0123abcd"), true);
        notifier.notify(&payload).await.unwrap();

        assert_eq!(rx.recv().await, Some(payload));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (addr, mut rx) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
        let notifier = WebhookNotifier::new(&format!("http://{addr}/callback"), Duration::from_secs(5)).unwrap();

        let payload = CallbackPayload::new(TaskId::from("feed"), true);
        match notifier.notify(&payload).await {
            Err(NotifyError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "received");
            }
            other => panic!("expected Status error, got: {other:?}"),
        }
        // Delivered exactly once, never retried.
        assert_eq!(rx.recv().await, Some(payload));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unreachable_receiver_is_an_http_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = WebhookNotifier::new(&format!("http://{addr}/callback"), Duration::from_secs(2)).unwrap();
        let payload = CallbackPayload::new(TaskId::from("dead"), true);
        assert!(matches!(notifier.notify(&payload).await, Err(NotifyError::Http(_))));
    }
}
