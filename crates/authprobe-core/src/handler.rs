//! Request/response handler.
//!
//! Reads the form fields, issues one GET and renders the outcome onto a
//! [`Surface`]. Stateless: every invocation re-reads its inputs.

use crate::request::{FormFields, FormSource, ProbeRequest};
use crate::surface::Surface;
use crate::transport::{ProbeResponse, RequestFailure, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What one invocation ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx: the raw body was written to the output region.
    Rendered(ProbeResponse),
    /// Transport/HTTP failure: region cleared, status and description alerted.
    Failed(RequestFailure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Rendered(_))
    }
}

/// Runs one invocation to completion on the current thread.
pub fn handle<T, S>(fields: &FormFields, transport: &T, surface: &S) -> Outcome
where
    T: Transport + ?Sized,
    S: Surface + ?Sized,
{
    let req = ProbeRequest::from_fields(fields);
    complete(&req, transport.get(&req), surface)
}

/// Starts one invocation and returns without waiting for the network.
///
/// Fields are read from `source` before this returns; the GET and the
/// surface writes happen later on tokio's blocking pool. Overlapping
/// submissions are not coordinated and render in arrival order.
///
/// Must be called from within a tokio runtime.
pub fn submit<F, T, S>(source: &F, transport: Arc<T>, surface: Arc<S>) -> JoinHandle<Outcome>
where
    F: FormSource + ?Sized,
    T: Transport + ?Sized + 'static,
    S: Surface + ?Sized + 'static,
{
    let req = ProbeRequest::from_fields(&source.read_fields());
    tracing::info!(url = %req.url, "GET submitted");
    tokio::task::spawn_blocking(move || {
        let result = transport.get(&req);
        complete(&req, result, &*surface)
    })
}

fn complete<S: Surface + ?Sized>(
    req: &ProbeRequest,
    result: Result<ProbeResponse, RequestFailure>,
    surface: &S,
) -> Outcome {
    if let Err(e) = surface.clear() {
        tracing::warn!("output region clear failed: {}", e);
    }
    match result {
        Ok(resp) => {
            tracing::info!(url = %req.url, status = resp.status, bytes = resp.body.len(), "GET succeeded");
            if tracing::enabled!(tracing::Level::DEBUG) && !resp.looks_like_json() {
                tracing::debug!(url = %req.url, "response body is not JSON; rendering as-is");
            }
            if let Err(e) = surface.insert_text(&resp.text()) {
                tracing::warn!("output region write failed: {}", e);
            }
            Outcome::Rendered(resp)
        }
        Err(failure) => {
            tracing::warn!(url = %req.url, status = failure.status, "GET failed: {}", failure.description);
            surface.alert(&failure.status.to_string());
            surface.alert(&failure.description);
            Outcome::Failed(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceEvent};
    use std::sync::Mutex;

    /// Replies with a fixed result and remembers every request it saw.
    struct FakeTransport {
        reply: Result<ProbeResponse, RequestFailure>,
        seen: Mutex<Vec<ProbeRequest>>,
    }

    impl FakeTransport {
        fn new(reply: Result<ProbeResponse, RequestFailure>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<ProbeRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, req: &ProbeRequest) -> Result<ProbeResponse, RequestFailure> {
            self.seen.lock().unwrap().push(req.clone());
            self.reply.clone()
        }
    }

    #[test]
    fn success_renders_raw_body_without_alerts() {
        let t = FakeTransport::new(Ok(ProbeResponse::new(200, r#"{"ok":true}"#)));
        let s = RecordingSurface::new();
        let out = handle(&FormFields::new("http://h/", "admin", "secret"), &t, &s);
        assert!(out.is_success());
        assert_eq!(s.contents(), r#"{"ok":true}"#);
        assert!(s.alerts().is_empty());
        assert_eq!(
            t.seen()[0].header("Authorization"),
            Some("Basic YWRtaW46c2VjcmV0")
        );
    }

    #[test]
    fn failure_clears_then_alerts_status_then_description() {
        let t = FakeTransport::new(Err(RequestFailure::http(401, "Unauthorized")));
        let s = RecordingSurface::new();
        s.insert_text("previous").unwrap();
        let out = handle(&FormFields::new("http://h/", "admin", "wrong"), &t, &s);
        assert_eq!(out, Outcome::Failed(RequestFailure::http(401, "Unauthorized")));
        assert_eq!(s.contents(), "");
        let events = s.events();
        assert_eq!(
            &events[1..],
            &[
                SurfaceEvent::Clear,
                SurfaceEvent::Alert("401".to_string()),
                SurfaceEvent::Alert("Unauthorized".to_string()),
            ]
        );
    }

    #[test]
    fn non_json_success_still_rendered() {
        let t = FakeTransport::new(Ok(ProbeResponse::new(204, "")));
        let s = RecordingSurface::new();
        s.insert_text("old").unwrap();
        handle(&FormFields::new("http://h/", "a", "b"), &t, &s);
        assert_eq!(s.contents(), "");
        assert!(s.alerts().is_empty());
    }

    #[test]
    fn reinvocation_uses_new_values() {
        let t = FakeTransport::new(Ok(ProbeResponse::new(200, "x")));
        let s = RecordingSurface::new();
        handle(&FormFields::new("http://one/", "alice", "a1"), &t, &s);
        handle(&FormFields::new("http://two/", "bob", "b2"), &t, &s);
        let seen = t.seen();
        assert_eq!(seen[1].url, "http://two/");
        assert_eq!(
            seen[1].header("Authorization").map(str::to_string),
            Some(crate::credentials::Credentials::new("bob", "b2").authorization_value())
        );
        assert_ne!(seen[0].header("Authorization"), seen[1].header("Authorization"));
    }

    /// Surface whose region writes always fail.
    struct BrokenSurface {
        alerts: Mutex<Vec<String>>,
    }

    impl Surface for BrokenSurface {
        fn clear(&self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn insert_text(&self, _text: &str) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn surface_write_errors_do_not_change_outcome() {
        let t = FakeTransport::new(Ok(ProbeResponse::new(200, "x")));
        let s = BrokenSurface {
            alerts: Mutex::new(Vec::new()),
        };
        let out = handle(&FormFields::new("http://h/", "u", "p"), &t, &s);
        assert_eq!(out, Outcome::Rendered(ProbeResponse::new(200, "x")));
        assert!(s.alerts.lock().unwrap().is_empty());

        let out = handle(
            &FormFields::new("http://h/", "u", "p"),
            &t,
            &crate::surface::FileSurface::new("/nonexistent_dir_authprobe/out.txt"),
        );
        assert!(out.is_success());
    }

    #[test]
    fn clear_error_still_alerts_on_failure() {
        let t = FakeTransport::new(Err(RequestFailure::http(500, "Internal Server Error")));
        let s = BrokenSurface {
            alerts: Mutex::new(Vec::new()),
        };
        let out = handle(&FormFields::new("http://h/", "u", "p"), &t, &s);
        assert!(!out.is_success());
        assert_eq!(
            *s.alerts.lock().unwrap(),
            vec!["500".to_string(), "Internal Server Error".to_string()]
        );
    }

    /// Blocks each GET until the test releases it.
    struct GatedTransport {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl Transport for GatedTransport {
        fn get(&self, _req: &ProbeRequest) -> Result<ProbeResponse, RequestFailure> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(ProbeResponse::new(200, "released"))
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn submit_returns_before_request_resolves() {
        let (release, gate) = std::sync::mpsc::channel();
        let t = Arc::new(GatedTransport {
            gate: Mutex::new(gate),
        });
        let s = Arc::new(RecordingSurface::new());
        let fields = FormFields::new("http://h/", "u", "p");

        let handle = submit(&fields, t, Arc::clone(&s));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert!(s.events().is_empty());

        release.send(()).unwrap();
        let out = handle.await.unwrap();
        assert!(out.is_success());
        assert_eq!(s.contents(), "released");
    }

    #[tokio::test]
    async fn submit_reads_fields_before_returning() {
        use std::cell::Cell;
        let t = Arc::new(FakeTransport::new(Ok(ProbeResponse::new(200, "done"))));
        let s = Arc::new(RecordingSurface::new());
        let reads = Cell::new(0);
        let source = || {
            reads.set(reads.get() + 1);
            FormFields::new("http://h/", "u", "p")
        };
        let handle = submit(&source, Arc::clone(&t), Arc::clone(&s));
        assert_eq!(reads.get(), 1);
        let out = handle.await.unwrap();
        assert!(out.is_success());
        assert_eq!(s.contents(), "done");
    }

    #[tokio::test]
    async fn submit_failure_alerts_in_order() {
        let t = Arc::new(FakeTransport::new(Err(RequestFailure::transport(
            "Couldn't connect to server",
        ))));
        let s = Arc::new(RecordingSurface::new());
        let fields = FormFields::new("http://127.0.0.1:1/", "u", "p");
        let out = submit(&fields, t, Arc::clone(&s)).await.unwrap();
        assert!(!out.is_success());
        assert_eq!(
            s.alerts(),
            vec!["0".to_string(), "Couldn't connect to server".to_string()]
        );
    }
}
