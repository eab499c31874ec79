//! 权益管理 API 处理器
//!
//! 查询与兑换对所有登录用户开放，增删改需要管理员权限

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, BenefitDto, BenefitListQuery, BenefitRequest, CostRangeQuery, SetQuantityRequest,
    UpdateBenefitRequest, parse_id,
};
use crate::error::{LedgerError, Result};
use crate::state::AppState;

fn to_dtos(benefits: Vec<crate::models::Benefit>) -> Vec<BenefitDto> {
    benefits.into_iter().map(BenefitDto::from).collect()
}

/// 分页列出权益
///
/// GET /api/beneficio?limit&skip
pub async fn list_benefits(
    State(state): State<AppState>,
    Query(query): Query<BenefitListQuery>,
) -> Result<Json<ApiResponse<Vec<BenefitDto>>>> {
    let (limit, skip) = query.page();
    let benefits = state.benefits.list(limit, skip).await?;
    Ok(Json(ApiResponse::success(to_dtos(benefits))))
}

/// 按积分区间列出权益
///
/// GET /api/beneficio/faixa?min&max&limit&skip
pub async fn list_by_cost_range(
    State(state): State<AppState>,
    Query(query): Query<CostRangeQuery>,
) -> Result<Json<ApiResponse<Vec<BenefitDto>>>> {
    query.validate_range()?;
    let (limit, skip) = query.page();
    let benefits = state
        .benefits
        .list_by_cost_range(query.min, query.max, limit, skip)
        .await?;
    Ok(Json(ApiResponse::success(to_dtos(benefits))))
}

/// 获取单个权益
///
/// GET /api/beneficio/id/{id}
pub async fn get_benefit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BenefitDto>>> {
    let benefit_id = parse_id(&id)?;
    let benefit = state
        .benefits
        .find_by_id(benefit_id)
        .await?
        .ok_or(LedgerError::BenefitNotFound(id))?;
    Ok(Json(ApiResponse::success(benefit.into())))
}

/// 按名称搜索权益
///
/// GET /api/beneficio/nome/{filtro}
pub async fn search_by_name(
    State(state): State<AppState>,
    Path(filter): Path<String>,
) -> Result<Json<ApiResponse<Vec<BenefitDto>>>> {
    let benefits = state.benefits.search_by_name(filter.trim()).await?;
    Ok(Json(ApiResponse::success(to_dtos(benefits))))
}

/// 创建权益
///
/// POST /api/beneficio
#[instrument(skip(state, claims, req), fields(operator = %claims.sub))]
pub async fn create_benefit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BenefitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BenefitDto>>)> {
    claims.require_admin()?;
    req.validate()?;

    let benefit = state.benefits.create(&req.into_new_benefit()).await?;
    info!(benefit_id = %benefit.id, name = %benefit.name, "Benefit created");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(benefit.into()))))
}

/// 更新权益（完整替换）
///
/// PUT /api/beneficio
#[instrument(skip(state, claims, req), fields(operator = %claims.sub, benefit_id = %req.id))]
pub async fn update_benefit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBenefitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BenefitDto>>)> {
    claims.require_admin()?;
    req.validate()?;

    let benefit_id = parse_id(&req.id)?;
    let fields = req.benefit.into_new_benefit();
    if !state.benefits.update(benefit_id, &fields).await? {
        return Err(LedgerError::BenefitNotFound(req.id));
    }

    info!("Benefit updated");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(BenefitDto {
            id: benefit_id,
            nome: fields.name,
            endereco: fields.address,
            pontos: fields.points_cost,
            data: fields.expires_on,
            quantidade: fields.quantity,
        })),
    ))
}

/// 设置权益可用数量（兑换时由调用方传入扣减后的数量）
///
/// PUT /api/beneficio/resgate
#[instrument(skip(state, claims, req), fields(user_id = %claims.sub, benefit_id = %req.id, quantity = req.quantidade))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BenefitDto>>)> {
    req.validate()?;

    let benefit_id = parse_id(&req.id)?;
    if !state.benefits.set_quantity(benefit_id, req.quantidade).await? {
        return Err(LedgerError::BenefitNotFound(req.id));
    }

    let benefit = state
        .benefits
        .find_by_id(benefit_id)
        .await?
        .ok_or_else(|| LedgerError::BenefitNotFound(benefit_id.to_string()))?;

    info!("Benefit quantity updated");

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(benefit.into()))))
}

/// 删除权益
///
/// DELETE /api/beneficio/{id}
pub async fn delete_benefit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    claims.require_admin()?;

    let benefit_id = parse_id(&id)?;
    if !state.benefits.delete(benefit_id).await? {
        return Err(LedgerError::BenefitNotFound(id));
    }

    info!(benefit_id = %benefit_id, operator = %claims.sub, "Benefit deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
