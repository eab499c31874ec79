//! 历史记录 API 处理器

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rewards_shared::observability::metrics;
use tracing::{info, instrument};

use crate::dto::{
    BalanceResponse, HistoryQuery, HistoryResponse, PointExistsResponse, RecordPointRequest,
    RecordTransactionRequest, RecordedResponse,
};
use crate::error::Result;
use crate::models::merge_history;
use crate::range::TimeRange;
use crate::state::AppState;

/// 追加积分获取记录
///
/// POST /hist/pontos
#[instrument(skip(state, req))]
pub async fn record_point(
    State(state): State<AppState>,
    Json(req): Json<RecordPointRequest>,
) -> Result<(StatusCode, Json<RecordedResponse>)> {
    let new = req.into_new()?;
    let point = state.repo.insert_point(&new).await?;

    metrics::record_history_event("ponto");
    info!(id = %point.id, id_user = %point.id_user, points = point.points, "Point recorded");

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            message: "积分记录已保存".to_string(),
            id: point.id,
        }),
    ))
}

/// 追加交易记录
///
/// POST /hist/transacoes
#[instrument(skip(state, req))]
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(req): Json<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<RecordedResponse>)> {
    let new = req.into_new()?;
    let tx = state.repo.insert_transaction(&new).await?;

    metrics::record_history_event("transacao");
    info!(id = tx.id, id_user = %tx.id_user, points = tx.points, "Transaction recorded");

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            message: "交易记录已保存".to_string(),
            id: tx.id.to_string(),
        }),
    ))
}

/// 查询用户合并历史（时间倒序）
///
/// GET /hist/{idUser}?start&end
pub async fn get_history(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let range = TimeRange::parse(query.start.as_deref(), query.end.as_deref(), state.offset)?;

    let (points, transactions) = tokio::try_join!(
        state.repo.list_points(&id_user, range),
        state.repo.list_transactions(&id_user, range),
    )?;

    Ok(Json(HistoryResponse {
        history: merge_history(points, transactions, state.offset),
    }))
}

/// 查询积分记录是否存在
///
/// GET /hist/pontos/{id}
pub async fn point_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointExistsResponse>> {
    let exists = state.repo.point_exists(&id).await?;
    Ok(Json(PointExistsResponse { id, exists }))
}

/// 用户历史积分合计
///
/// GET /hist/{idUser}/saldo
pub async fn get_balance(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
) -> Result<Json<BalanceResponse>> {
    let totals = state.repo.totals(&id_user).await?;
    Ok(Json(BalanceResponse {
        id_user,
        points_total: totals.points,
        transactions_total: totals.transactions,
        total: totals.total(),
    }))
}
