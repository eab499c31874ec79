//! 用户管理 API 处理器（管理员）

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::info;

use crate::auth::Claims;
use crate::dto::{ApiResponse, UserDto, parse_id};
use crate::error::{LedgerError, Result};
use crate::state::AppState;

/// 按姓名排序列出用户
///
/// GET /api/usuario
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>> {
    claims.require_admin()?;

    let users = state.users.list().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// 按 ID 获取用户
///
/// GET /api/usuario/id/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>> {
    claims.require_admin()?;

    let user_id = parse_id(&id)?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(LedgerError::UserNotFound(id))?;

    Ok(Json(ApiResponse::success(user.into())))
}

/// 删除用户
///
/// DELETE /api/usuario/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    claims.require_admin()?;

    let user_id = parse_id(&id)?;
    if !state.users.delete(user_id).await? {
        return Err(LedgerError::UserNotFound(id));
    }

    info!(user_id = %user_id, operator = %claims.sub, "User deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
