//! 积分余额 API 处理器
//!
//! 余额写入是整值覆盖（设置为新值），增减计算由调用方完成

use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{ApiResponse, PointsDto, SetPointsRequest, SetUserPointsRequest, parse_id};
use crate::error::{LedgerError, Result};
use crate::state::AppState;

/// 查询当前用户余额
///
/// GET /api/usuario/pontos
pub async fn get_my_points(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<PointsDto>>> {
    let user_id = claims.user_id()?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;

    Ok(Json(ApiResponse::success(PointsDto {
        id: user.id,
        pontos: user.points,
    })))
}

/// 设置当前用户余额
///
/// PUT /api/usuario/pontos
#[instrument(skip(state, claims, req), fields(user_id = %claims.sub, points = req.pontos))]
pub async fn set_my_points(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetPointsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PointsDto>>)> {
    req.validate()?;

    let user_id = claims.user_id()?;
    if !state.users.set_points(user_id, req.pontos).await? {
        return Err(LedgerError::UserNotFound(user_id.to_string()));
    }

    info!("Balance updated");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(PointsDto {
            id: user_id,
            pontos: req.pontos,
        })),
    ))
}

/// 设置指定用户余额（管理员）
///
/// PUT /api/usuario/pontosPut
#[instrument(skip(state, claims, req), fields(operator = %claims.sub, points = req.pontos))]
pub async fn set_user_points(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetUserPointsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PointsDto>>)> {
    claims.require_admin()?;
    req.validate()?;

    let user_id = parse_id(&req.id)?;
    if !state.users.set_points(user_id, req.pontos).await? {
        return Err(LedgerError::UserNotFound(req.id));
    }

    info!(user_id = %user_id, "Balance updated by admin");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(PointsDto {
            id: user_id,
            pontos: req.pontos,
        })),
    ))
}
