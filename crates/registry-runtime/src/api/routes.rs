//! Router and handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use registry_telemetry::encode_metrics;
use serde_json::json;
use shared_types::{TransactionHash, TransactionStatusRecord};
use uuid::Uuid;

use crate::api::dto::{
    BlockDto, BlocksQuery, MerkleProofDto, SendTransactionsRequest, SendTransactionsResponse,
    StreamTransactionDto, MAX_BLOCK_PAGE,
};
use crate::api::error::ApiError;
use crate::service::RegistryService;

/// Build the HTTP router over `service`.
pub fn router(service: Arc<RegistryService>) -> Router {
    Router::new()
        .route("/v1/transactions", post(send_transactions))
        .route("/v1/transactions/:hash/status", get(get_transaction_status))
        .route("/v1/transactions/:hash/block", get(get_block))
        .route("/v1/transactions/:hash/proof", get(get_merkle_proof))
        .route("/v1/streams/:stream_id/transactions", get(get_stream_transactions))
        .route("/v1/blocks", get(get_blocks))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(service)
}

fn parse_transaction_hash(raw: &str) -> Result<TransactionHash, ApiError> {
    TransactionHash::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn send_transactions(
    State(service): State<Arc<RegistryService>>,
    Json(request): Json<SendTransactionsRequest>,
) -> Result<(StatusCode, Json<SendTransactionsResponse>), ApiError> {
    let transactions = request
        .transactions
        .into_iter()
        .map(|dto| dto.into_transaction())
        .collect::<Result<Vec<_>, _>>()?;

    let hashes = service.send_transactions(transactions).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(SendTransactionsResponse {
            transaction_hashes: hashes.iter().map(ToString::to_string).collect(),
        }),
    ))
}

async fn get_transaction_status(
    State(service): State<Arc<RegistryService>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionStatusRecord>, ApiError> {
    let hash = parse_transaction_hash(&hash)?;
    Ok(Json(service.get_transaction_status(&hash).await?))
}

async fn get_stream_transactions(
    State(service): State<Arc<RegistryService>>,
    Path(stream_id): Path<String>,
) -> Result<Json<Vec<StreamTransactionDto>>, ApiError> {
    let stream_id = Uuid::parse_str(&stream_id)
        .map_err(|e| ApiError::BadRequest(format!("stream id: {e}")))?;
    let transactions = service.get_stream_transactions(stream_id).await?;
    let listing = transactions
        .iter()
        .map(StreamTransactionDto::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(listing))
}

async fn get_blocks(
    State(service): State<Arc<RegistryService>>,
    Query(query): Query<BlocksQuery>,
) -> Result<Json<Vec<BlockDto>>, ApiError> {
    if query.take > MAX_BLOCK_PAGE {
        return Err(ApiError::BadRequest(format!(
            "take must be at most {MAX_BLOCK_PAGE}, got {}",
            query.take
        )));
    }
    let blocks = service
        .get_blocks(query.skip, query.take, query.include_transactions)
        .await?;
    let page = blocks
        .iter()
        .map(|block| BlockDto::from_block(block, query.include_transactions))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(page))
}

async fn get_block(
    State(service): State<Arc<RegistryService>>,
    Path(hash): Path<String>,
) -> Result<Json<BlockDto>, ApiError> {
    let hash = parse_transaction_hash(&hash)?;
    let block = service
        .get_block(&hash)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("transaction {hash} is not in a block")))?;
    Ok(Json(BlockDto::from_block(&block, false)?))
}

async fn get_merkle_proof(
    State(service): State<Arc<RegistryService>>,
    Path(hash): Path<String>,
) -> Result<Json<MerkleProofDto>, ApiError> {
    let hash = parse_transaction_hash(&hash)?;
    let proof = service
        .get_merkle_proof(&hash)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("transaction {hash} is not in a block")))?;
    Ok(Json(MerkleProofDto::from(&proof)))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "registry",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics() -> impl IntoResponse {
    match encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
