#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use market_data_ingestor::chain::ProviderUrls;

/// Canned answer for one route.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
pub struct StubConfig {
    pub download: Canned,
    pub chart: Canned,
    /// Keyed by the `s` query parameter; unknown symbols get "No data".
    pub stooq: HashMap<String, Canned>,
}

#[derive(Default)]
pub struct Hits {
    pub download: Vec<String>,
    pub chart: Vec<String>,
    pub stooq: Vec<String>,
}

struct StubState {
    config: StubConfig,
    hits: Arc<Mutex<Hits>>,
}

pub struct StubServer {
    pub addr: SocketAddr,
    pub hits: Arc<Mutex<Hits>>,
}

impl StubServer {
    pub fn urls(&self) -> ProviderUrls {
        ProviderUrls {
            primary: format!("http://{}/download", self.addr),
            chart: format!("http://{}/chart", self.addr),
            csv: format!("http://{}/stooq", self.addr),
        }
    }

    pub fn stooq_hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().stooq.clone()
    }

    pub fn tier_hits(&self) -> (usize, usize, usize) {
        let h = self.hits.lock().unwrap();
        (h.download.len(), h.chart.len(), h.stooq.len())
    }
}

async fn answer(canned: &Canned) -> (StatusCode, String) {
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }
    (canned.status, canned.body.clone())
}

async fn download(
    State(state): State<Arc<StubState>>,
    Path(symbol): Path<String>,
) -> (StatusCode, String) {
    state.hits.lock().unwrap().download.push(symbol);
    answer(&state.config.download).await
}

async fn chart(
    State(state): State<Arc<StubState>>,
    Path(symbol): Path<String>,
) -> (StatusCode, String) {
    state.hits.lock().unwrap().chart.push(symbol);
    answer(&state.config.chart).await
}

async fn stooq(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let symbol = query.get("s").cloned().unwrap_or_default();
    state.hits.lock().unwrap().stooq.push(symbol.clone());
    match state.config.stooq.get(&symbol) {
        Some(canned) => answer(canned).await,
        None => (StatusCode::OK, "No data".to_string()),
    }
}

pub async fn spawn_stub(config: StubConfig) -> StubServer {
    let hits = Arc::new(Mutex::new(Hits::default()));
    let state = Arc::new(StubState {
        config,
        hits: hits.clone(),
    });

    let app = Router::new()
        .route("/download/{symbol}", get(download))
        .route("/chart/{symbol}", get(chart))
        .route("/stooq", get(stooq))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    StubServer { addr, hits }
}

pub const DOWNLOAD_HEADER_ONLY: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n";

pub const CHART_NO_TRADING_DAYS: &str =
    r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"},"indicators":{"quote":[{}]}}],"error":null}}"#;

/// Weekday rows from the first half of June 2024.
pub const STOOQ_JUNE_2024: &str = "\
Date,Open,High,Low,Close,Volume
2024-06-03,192.90,194.99,192.52,194.03,50080539
2024-06-04,194.64,195.32,193.03,194.35,47471445
2024-06-05,195.40,196.90,194.87,195.87,54156785
2024-06-06,195.69,196.50,194.17,194.48,41181753
2024-06-07,194.65,196.94,194.14,196.89,53103912
2024-06-10,196.90,197.30,192.15,193.12,97262077
";
