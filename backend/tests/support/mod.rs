#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use authoridy::api::{ContributionQuery, PagedResult};
use authoridy::http::{create_router, AppState};
use authoridy::providers::{ContributionProvider, ProviderError, ProviderResult};
use authoridy::registry::{HandlerRegistry, ProviderKind};

pub const TEST_BASE: &str = "http://authoridy.test";

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// What a [`StubProvider`] does when invoked.
#[derive(Clone)]
pub enum StubBehavior {
    Nothing,
    Returns(PagedResult),
    Fails,
    RejectsQuery,
    Panics,
    Hangs,
}

/// Provider with scripted behavior that records its invocations.
pub struct StubProvider {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_query: Mutex<Option<ContributionQuery>>,
}

impl StubProvider {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ContributionQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContributionProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Demo
    }

    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        match &self.behavior {
            StubBehavior::Nothing => Ok(None),
            StubBehavior::Returns(paged) => Ok(Some(paged.clone())),
            StubBehavior::Fails => Err(ProviderError::Decode(
                "secret upstream detail at line 42".to_string(),
            )),
            StubBehavior::RejectsQuery => {
                Err(ProviderError::InvalidQuery("page must be a number".to_string()))
            }
            StubBehavior::Panics => panic!("provider blew up with secret detail"),
            StubBehavior::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// Router serving `provider` under the handler name `stub`.
pub fn stub_router(provider: Arc<StubProvider>) -> Router {
    let registry = HandlerRegistry::named([("stub", provider as Arc<dyn ContributionProvider>)]);
    create_router(AppState::new(registry, "author", TEST_BASE), None)
}

/// Router over an arbitrary state.
pub fn router(state: AppState) -> Router {
    create_router(state, None)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Send one request through the router in-process.
pub async fn send(router: Router, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(router: Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri).await
}

/// Serve `router` on an ephemeral local port and return its origin.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
