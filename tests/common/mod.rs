//! Shared test utilities and fixtures.

#![allow(dead_code)]

use cranscope::testing::{make_oracle, FixedSource};
use cranscope::{
    build_router, AppState, Config, PackageIndex, PopularityOracle, RankedPackage, SearchService,
};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

// Re-export canonical test utilities from cranscope::testing
pub use cranscope::testing::{make_author_record, make_record, oracle_with};

// ============================================================================
// FIXTURE SNAPSHOT
// ============================================================================

/// Canonical-format snapshot with 18 packages.
pub const SNAPSHOT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/cran_snapshot.json");

/// Annual downloads for the fixture packages. `tsnew` is deliberately absent
/// and scores 0. `aTSA` and `tsdecomp` tie.
pub const DOWNLOADS: &[(&str, u64)] = &[
    ("dplyr", 7_000_000),
    ("ggplot2", 6_000_000),
    ("zoo", 3_100_000),
    ("xts", 2_200_000),
    ("forecast", 1_900_000),
    ("plyr", 1_500_000),
    ("tseries", 900_000),
    ("tsibble", 400_000),
    ("fable", 150_000),
    ("limma", 120_000),
    ("DESeq2", 90_000),
    ("edgeR", 80_000),
    ("aTSA", 12_000),
    ("tsdecomp", 12_000),
    ("chenlab", 3_000),
    ("scMeta", 2_500),
    ("coauthr", 800),
];

static FIXTURE_INDEX: LazyLock<Arc<PackageIndex>> = LazyLock::new(|| {
    Arc::new(PackageIndex::load(SNAPSHOT_PATH).expect("Failed to load fixture snapshot"))
});

/// The fixture index, loaded once per test binary.
pub fn fixture_index() -> Arc<PackageIndex> {
    FIXTURE_INDEX.clone()
}

/// Source answering the fixture download table.
pub fn fixture_source() -> FixedSource {
    DOWNLOADS
        .iter()
        .fold(FixedSource::new(), |s, (name, n)| s.yearly(name, *n))
}

pub fn fixture_oracle() -> Arc<PopularityOracle> {
    make_oracle(Arc::new(fixture_source()))
}

/// A service over the fixture snapshot with default config.
pub fn fixture_service() -> SearchService {
    fixture_service_with(Config::default())
}

pub fn fixture_service_with(config: Config) -> SearchService {
    SearchService::with_oracle(config, fixture_index(), fixture_oracle())
}

/// Package names of a result list, in order.
pub fn names(results: &[RankedPackage]) -> Vec<&str> {
    results.iter().map(|r| r.package.as_str()).collect()
}

// ============================================================================
// HTTP
// ============================================================================

/// Serve the fixture service on an ephemeral port.
pub async fn spawn_server() -> SocketAddr {
    spawn_service(fixture_service()).await
}

/// Serve `service` through the full router on an ephemeral port.
pub async fn spawn_service(service: SearchService) -> SocketAddr {
    spawn_router(build_router(AppState::new(Arc::new(service)))).await
}

/// Serve any router on an ephemeral port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

/// Raw HTTP/1.1 GET. Returns (status, body).
pub async fn send_raw(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, body.to_string())
}

/// `send_raw` plus JSON decoding of the body.
pub async fn get_json(addr: SocketAddr, path: &str) -> (u16, serde_json::Value) {
    let (status, body) = send_raw(addr, path).await;
    let json = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("non-JSON body for {path}: {e}\n{body}"));
    (status, json)
}
