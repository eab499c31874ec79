//! 认证相关的 HTTP 处理器
//!
//! 提供服务信息、注册、登录、当前用户与修改密码的 API

use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::{Claims, hash_password, verify_password};
use crate::dto::{
    ApiResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ServiceInfo,
    UserDto,
};
use crate::error::{LedgerError, Result};
use crate::models::NewUser;
use crate::state::AppState;

/// 服务信息
///
/// GET /api
pub async fn service_info() -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::success(ServiceInfo {
        app: "API Recicla Pontos".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// 用户注册
///
/// POST /api/usuario
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>)> {
    req.validate()?;

    let email = req.email.trim().to_string();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(LedgerError::EmailAlreadyExists(email));
    }

    let password_hash = hash_password(&req.senha)?;
    let new_user = NewUser::new(
        req.nome.trim().to_string(),
        email,
        password_hash,
        state.ledger.initial_points,
    );
    let user = state.users.create(&new_user).await?;

    info!(user_id = %user.id, points = user.points, "User registered");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

/// 用户登录
///
/// POST /api/usuario/login
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;

    let email = req.email.trim();
    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| LedgerError::EmailNotRegistered(email.to_string()))?;

    if !verify_password(&req.senha, &user.password_hash)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(LedgerError::InvalidCredentials);
    }

    if !user.active {
        warn!(user_id = %user.id, "Login refused: user inactive");
        return Err(LedgerError::UserInactive);
    }

    let (token, expires_at) = state.jwt_manager.generate_token(&user)?;

    info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(ApiResponse::success(LoginResponse {
        access_token: token,
        redirect_url: user.role.landing_page().to_string(),
        expires_at,
    })))
}

/// 当前登录用户信息
///
/// GET /api/usuario/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let user_id = claims.user_id()?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;

    Ok(Json(ApiResponse::success(user.into())))
}

/// 修改当前用户密码
///
/// PUT /api/usuario/senha
#[instrument(skip(state, claims, req), fields(user_id = %claims.sub))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;

    if !verify_password(&req.senha_atual, &user.password_hash)? {
        return Err(LedgerError::CurrentPasswordMismatch);
    }

    let password_hash = hash_password(&req.nova_senha)?;
    if !state.users.update_password(user_id, &password_hash).await? {
        return Err(LedgerError::UserNotFound(user_id.to_string()));
    }

    info!("Password changed");

    Ok(Json(ApiResponse::<()>::success_with_message((), "密码已更新")))
}
