//! Privileged boundary between the UI surface and the trusted process.
//!
//! The UI surface only ever holds a [`BridgeClient`]. Each call becomes a
//! [`BridgeRequest`] on an mpsc channel with a oneshot for the reply, so the
//! caller sees a plain async function while the trusted side decides and
//! performs the work. [`BridgeHost`] answers requests one at a time.
//!
//! Nothing is cached: every permission request shows the dialog again and
//! every source request re-enumerates.

use super::CaptureSource;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// IPC channel names, matching the commands exposed to the webview.
pub const REQUEST_SCREENSHOT_PERMISSION: &str = "request-screenshot-permission";
pub const GET_SCREEN_SOURCES: &str = "get-screen-sources";

#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("Privileged bridge is closed")]
    Closed,

    #[error("Failed to enumerate screens: {0}")]
    Enumeration(String),
}

/// Everything the UI surface may ask of the trusted process.
#[async_trait]
pub trait PrivilegedBridge: Send + Sync {
    /// Show the consent dialog. `true` only if the user picked Allow.
    async fn request_screenshot_permission(&self) -> Result<bool, BridgeError>;

    /// Currently capturable screens, in OS enumeration order.
    async fn get_screen_sources(&self) -> Result<Vec<CaptureSource>, BridgeError>;
}

/// Text of the Allow/Deny dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentPrompt {
    pub title: String,
    pub message: String,
    /// Default button.
    pub allow_label: String,
    /// Also the outcome when the dialog is dismissed.
    pub deny_label: String,
}

impl ConsentPrompt {
    pub fn screenshot() -> Self {
        Self {
            title: "Screen Capture Permission".to_string(),
            message: "Allow this app to take a screenshot of your screen?".to_string(),
            allow_label: "Allow".to_string(),
            deny_label: "Deny".to_string(),
        }
    }
}

/// Modal binary choice shown by the trusted process.
#[async_trait]
pub trait ConsentGate: Send + Sync {
    /// `true` iff the user chose the allow button. Dismissal is a denial.
    async fn ask(&self, prompt: &ConsentPrompt) -> bool;
}

/// Lists capturable screens (not individual windows).
pub trait SourceEnumerator: Send + Sync {
    fn screens(&self) -> Result<Vec<CaptureSource>, BridgeError>;
}

/// One call across the boundary, with its reply slot.
#[derive(Debug)]
pub enum BridgeRequest {
    ScreenshotPermission {
        reply: oneshot::Sender<bool>,
    },
    ScreenSources {
        reply: oneshot::Sender<Result<Vec<CaptureSource>, BridgeError>>,
    },
}

impl BridgeRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            BridgeRequest::ScreenshotPermission { .. } => REQUEST_SCREENSHOT_PERMISSION,
            BridgeRequest::ScreenSources { .. } => GET_SCREEN_SOURCES,
        }
    }
}

/// Create a connected client and the request stream for a [`BridgeHost`].
pub fn bridge_channel(capacity: usize) -> (BridgeClient, mpsc::Receiver<BridgeRequest>) {
    let (tx, rx) = mpsc::channel(capacity);
    (BridgeClient { tx }, rx)
}

/// UI-side handle. Cheap to clone; every clone talks to the same host.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    tx: mpsc::Sender<BridgeRequest>,
}

impl BridgeClient {
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> BridgeRequest,
    ) -> Result<T, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| BridgeError::Closed)?;
        response.await.map_err(|_| BridgeError::Closed)
    }
}

#[async_trait]
impl PrivilegedBridge for BridgeClient {
    async fn request_screenshot_permission(&self) -> Result<bool, BridgeError> {
        self.call(|reply| BridgeRequest::ScreenshotPermission { reply })
            .await
    }

    async fn get_screen_sources(&self) -> Result<Vec<CaptureSource>, BridgeError> {
        self.call(|reply| BridgeRequest::ScreenSources { reply })
            .await?
    }
}

/// Trusted-side request handler.
pub struct BridgeHost<C, E> {
    consent: C,
    sources: E,
}

impl<C: ConsentGate, E: SourceEnumerator> BridgeHost<C, E> {
    pub fn new(consent: C, sources: E) -> Self {
        Self { consent, sources }
    }

    /// Ask the user, every time.
    pub async fn request_capture_permission(&self) -> bool {
        let allowed = self.consent.ask(&ConsentPrompt::screenshot()).await;
        log::info!(
            "[BRIDGE] Screen capture {}",
            if allowed { "allowed" } else { "denied" }
        );
        allowed
    }

    pub fn list_capture_sources(&self) -> Result<Vec<CaptureSource>, BridgeError> {
        let sources = self.sources.screens()?;
        log::debug!("[BRIDGE] {} screen source(s) available", sources.len());
        Ok(sources)
    }

    /// Answer one request. A caller that gave up is not an error.
    pub async fn handle(&self, request: BridgeRequest) {
        let channel = request.channel();
        let delivered = match request {
            BridgeRequest::ScreenshotPermission { reply } => {
                reply.send(self.request_capture_permission().await).is_ok()
            }
            BridgeRequest::ScreenSources { reply } => {
                reply.send(self.list_capture_sources()).is_ok()
            }
        };
        if !delivered {
            log::debug!("[BRIDGE] Caller dropped before '{}' reply", channel);
        }
    }

    /// Serve requests until every client has been dropped.
    pub async fn serve(self, mut requests: mpsc::Receiver<BridgeRequest>) {
        log::info!("[BRIDGE] Privileged bridge ready");
        while let Some(request) = requests.recv().await {
            self.handle(request).await;
        }
        log::info!("[BRIDGE] All clients gone, bridge stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedConsent {
        answer: bool,
        asked: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ConsentGate for ScriptedConsent {
        async fn ask(&self, prompt: &ConsentPrompt) -> bool {
            assert_eq!(prompt.allow_label, "Allow");
            assert_eq!(prompt.deny_label, "Deny");
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    struct FixedScreens(Result<Vec<CaptureSource>, BridgeError>);

    impl SourceEnumerator for FixedScreens {
        fn screens(&self) -> Result<Vec<CaptureSource>, BridgeError> {
            self.0.clone()
        }
    }

    fn screens(names: &[&str]) -> Vec<CaptureSource> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| CaptureSource {
                id: crate::capture::screen_source_id(i as u32 + 1),
                name: name.to_string(),
            })
            .collect()
    }

    fn spawn_host(
        answer: bool,
        sources: Result<Vec<CaptureSource>, BridgeError>,
    ) -> (BridgeClient, Arc<AtomicUsize>) {
        let asked = Arc::new(AtomicUsize::new(0));
        let host = BridgeHost::new(
            ScriptedConsent {
                answer,
                asked: asked.clone(),
            },
            FixedScreens(sources),
        );
        let (client, requests) = bridge_channel(4);
        tokio::spawn(host.serve(requests));
        (client, asked)
    }

    #[tokio::test]
    async fn permission_reflects_user_choice() {
        let (allow, _) = spawn_host(true, Ok(vec![]));
        let (deny, _) = spawn_host(false, Ok(vec![]));
        assert!(allow.request_screenshot_permission().await.unwrap());
        assert!(!deny.request_screenshot_permission().await.unwrap());
    }

    #[tokio::test]
    async fn every_request_prompts_again() {
        let (client, asked) = spawn_host(true, Ok(vec![]));
        for _ in 0..3 {
            assert!(client.request_screenshot_permission().await.unwrap());
        }
        assert_eq!(asked.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn sources_keep_enumeration_order() {
        let (client, _) = spawn_host(true, Ok(screens(&["Left", "Primary", "Right"])));
        let names: Vec<String> = client
            .get_screen_sources()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Left", "Primary", "Right"]);
    }

    #[tokio::test]
    async fn enumeration_failure_reaches_the_caller() {
        let (client, _) = spawn_host(true, Err(BridgeError::Enumeration("denied".into())));
        assert!(matches!(
            client.get_screen_sources().await,
            Err(BridgeError::Enumeration(_))
        ));
    }

    #[tokio::test]
    async fn closed_host_reports_closed() {
        let (client, requests) = bridge_channel(1);
        drop(requests);
        assert!(matches!(
            client.request_screenshot_permission().await,
            Err(BridgeError::Closed)
        ));
        assert!(matches!(
            client.get_screen_sources().await,
            Err(BridgeError::Closed)
        ));
    }

    #[test]
    fn requests_name_their_ipc_channel() {
        let (reply, _) = oneshot::channel();
        assert_eq!(
            BridgeRequest::ScreenshotPermission { reply }.channel(),
            "request-screenshot-permission"
        );
        let (reply, _) = oneshot::channel();
        assert_eq!(
            BridgeRequest::ScreenSources { reply }.channel(),
            "get-screen-sources"
        );
    }
}
