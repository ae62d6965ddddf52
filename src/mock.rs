//! In-process mock backend for HTTP tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;

use crate::config::ClientConfig;

/// Serve `router` on an ephemeral port and return a config pointing at its
/// `/api` prefix. Routes must include that prefix.
pub(crate) async fn serve(router: Router) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ClientConfig::new(&format!("http://{addr}/api"))
}

/// Config pointing at a port nothing listens on.
pub(crate) fn dead_config() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    ClientConfig::new(&format!("http://{addr}/api"))
}

/// Shared request counter for handlers.
#[derive(Clone, Default)]
pub(crate) struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub(crate) fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
