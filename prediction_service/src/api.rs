//! HTTP surface. Every route answers 200 with a JSON body; failures are
//! reported inside the body.

use std::{panic::AssertUnwindSafe, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::{
    models::{
        ErrorBody, FILE_TOO_LARGE, FilePredictResponse, FilePrediction, NO_DATA, NO_FILE,
        OhlcResponse, OhlcRow, PredictResponse, PredictionResult, SERVICE_UNAVAILABLE,
    },
    pipeline::{PipelineError, resolve_window},
    state::AppState,
    upload::parse_upload_closes,
};

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub ticker: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/predict", get(predict))
        .route("/ohlc", get(ohlc))
        .route(
            "/predict-file",
            post(predict_file).layer(DefaultBodyLimit::max(state.upload_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Prediction API is running" }))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<PredictResponse> {
    let today = Utc::now().date_naive();

    let outcome = AssertUnwindSafe(async {
        let params = resolve_window(
            &query.ticker,
            query.start.as_deref(),
            query.end.as_deref(),
            today,
        )?;
        state.service.predict(&params).await
    })
    .catch_unwind()
    .await;

    let fallback = || {
        let date = query
            .end
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| today.to_string());
        PredictResponse::Prediction(PredictionResult::neutral(query.ticker.to_uppercase(), date))
    };

    Json(match outcome {
        Ok(Ok(result)) => PredictResponse::Prediction(result),
        Ok(Err(PipelineError::NoData(_))) => PredictResponse::Error(ErrorBody { error: NO_DATA }),
        Ok(Err(e)) => {
            warn!(ticker = %query.ticker, error = %e, "predict failed, answering neutral");
            fallback()
        }
        Err(_) => {
            error!(ticker = %query.ticker, "predict panicked, answering neutral");
            fallback()
        }
    })
}

async fn ohlc(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<OhlcResponse> {
    let today = Utc::now().date_naive();

    let outcome = AssertUnwindSafe(async {
        let params = resolve_window(
            &query.ticker,
            query.start.as_deref(),
            query.end.as_deref(),
            today,
        )?;
        state.service.ohlc(&params).await
    })
    .catch_unwind()
    .await;

    Json(match outcome {
        Ok(Ok(series)) => OhlcResponse::rows(series.bars.iter().map(OhlcRow::from).collect()),
        Ok(Err(PipelineError::NoData(_))) => OhlcResponse::failed(NO_DATA),
        Ok(Err(e)) => {
            warn!(ticker = %query.ticker, error = %e, "ohlc failed");
            OhlcResponse::failed(SERVICE_UNAVAILABLE)
        }
        Err(_) => {
            error!(ticker = %query.ticker, "ohlc panicked");
            OhlcResponse::failed(SERVICE_UNAVAILABLE)
        }
    })
}

fn upload_failure(status: StatusCode) -> &'static str {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        FILE_TOO_LARGE
    } else {
        NO_FILE
    }
}

fn unreadable(e: &MultipartError) -> &'static str {
    warn!(error = %e, "unreadable multipart upload");
    upload_failure(e.status())
}

/// First `file` field of the form as `(filename, contents)`, or the error
/// code to answer with.
async fn read_upload(mut multipart: Multipart) -> Result<(String, String), &'static str> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(NO_FILE),
            Err(e) => return Err(unreadable(&e)),
        };
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        return match field.bytes().await {
            Ok(bytes) => Ok((filename, String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) => Err(unreadable(&e)),
        };
    }
}

async fn predict_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<FilePredictResponse> {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => {
            warn!(error = %rejection, "predict-file without a multipart body");
            Err(upload_failure(rejection.status()))
        }
    };
    let (filename, text) = match upload {
        Ok(upload) => upload,
        Err(code) => return Json(FilePredictResponse::Error(ErrorBody { error: code })),
    };

    let closes = match parse_upload_closes(&text) {
        Ok(closes) => closes,
        Err(e) => {
            return Json(FilePredictResponse::Error(ErrorBody { error: e.code() }));
        }
    };

    let inference = state.service.predict_closes(&closes);
    tracing::info!(
        file = %filename,
        points = closes.len(),
        backend = %inference.backend,
        "file prediction served"
    );

    Json(FilePredictResponse::Prediction(FilePrediction {
        direction: inference.signal.direction,
        confidence: inference.signal.confidence,
        symbol: filename,
        date: String::new(),
    }))
}
