#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, header},
};
use chrono::NaiveDate;
use direction_inference::{
    BackendKind, InferError, InferenceDispatcher, PredictionBackend, Probability,
};
use market_data_ingestor::{
    chain::ProviderChain,
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError, ProviderId, errors::MalformedSnafu},
};
use prediction_service::{api::app_router, pipeline::PredictionService, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

pub enum Stub {
    Empty,
    Failing,
    Bars(Vec<Bar>),
    Panicking,
    Hanging,
}

pub struct StubProvider {
    pub id: ProviderId,
    pub behaviour: Stub,
}

#[async_trait]
impl DataProvider for StubProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        match &self.behaviour {
            Stub::Empty => Ok(BarSeries::new(params.symbol.clone(), Vec::new())),
            Stub::Failing => MalformedSnafu {
                provider: self.id,
                message: "stub failure",
            }
            .fail(),
            Stub::Bars(bars) => Ok(BarSeries::new(params.symbol.clone(), bars.clone())),
            Stub::Panicking => panic!("provider blew up"),
            Stub::Hanging => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

pub fn tier(id: ProviderId, behaviour: Stub) -> Box<dyn DataProvider> {
    Box::new(StubProvider { id, behaviour })
}

/// Every tier fails or comes back empty.
pub fn dead_chain() -> ProviderChain {
    ProviderChain::new(vec![
        tier(ProviderId::Primary, Stub::Failing),
        tier(ProviderId::ChartApi, Stub::Empty),
        tier(ProviderId::CsvProvider, Stub::Failing),
    ])
}

/// Primary fails, chart API answers with `bars`.
pub fn chart_chain(bars: Vec<Bar>) -> ProviderChain {
    ProviderChain::new(vec![
        tier(ProviderId::Primary, Stub::Failing),
        tier(ProviderId::ChartApi, Stub::Bars(bars)),
        tier(ProviderId::CsvProvider, Stub::Failing),
    ])
}

pub struct FixedBackend(pub BackendKind, pub f64);

impl PredictionBackend for FixedBackend {
    fn kind(&self) -> BackendKind {
        self.0
    }

    fn infer(&self, _closes: &[f64]) -> Result<Probability, InferError> {
        Probability::new(self.1).ok_or(InferError::InvalidOutput(self.1))
    }
}

/// A dispatcher whose classical tier always answers `p`.
pub fn classical_at(p: f64) -> InferenceDispatcher {
    InferenceDispatcher::with_backends(None, Some(Box::new(FixedBackend(BackendKind::Classical, p))))
}

pub fn router(chain: ProviderChain, dispatcher: InferenceDispatcher) -> Router {
    app_router(AppState::new(PredictionService::new(chain, dispatcher)))
}

pub fn router_with_upload_limit(
    chain: ProviderChain,
    dispatcher: InferenceDispatcher,
    upload_limit: usize,
) -> Router {
    app_router(AppState::with_upload_limit(
        PredictionService::new(chain, dispatcher),
        upload_limit,
    ))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive daily bars from `start`, closes rising by one.
pub fn daily_bars(start: NaiveDate, n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            Bar::from_raw(
                start + chrono::Days::new(i as u64),
                Some(close - 0.5),
                Some(close + 1.0),
                Some(close - 1.0),
                Some(close),
                Some(1_000.0),
            )
            .unwrap()
        })
        .collect()
}

pub async fn get_json(app: Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const BOUNDARY: &str = "X-PREDICT-TEST-BOUNDARY";

/// Posts a single multipart field named `field` to `/predict-file`.
pub async fn post_file(app: Router, field: &str, filename: &str, contents: &[u8]) -> Value {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/predict-file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
