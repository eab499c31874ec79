//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::is_strong_password;
use crate::error::LedgerError;
use crate::models::NewBenefit;

/// 分页默认条数
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
/// 分页最大条数
pub const MAX_PAGE_LIMIT: i64 = 100;

fn digits_only(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if digits_only(trimmed) {
        return Err(ValidationError::new("digits_only").with_message("姓名不能只包含数字".into()));
    }
    if !trimmed.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ValidationError::new("letters_only").with_message("姓名只能包含字母和空格".into()));
    }
    Ok(())
}

fn validate_lowercase(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_uppercase()) {
        return Err(ValidationError::new("lowercase").with_message("邮箱不允许包含大写字母".into()));
    }
    Ok(())
}

fn validate_strong_password(value: &str) -> Result<(), ValidationError> {
    if !is_strong_password(value) {
        return Err(ValidationError::new("weak_password")
            .with_message("密码至少 6 位，且需包含大写字母、小写字母、数字和符号".into()));
    }
    Ok(())
}

fn validate_benefit_name(value: &str) -> Result<(), ValidationError> {
    if digits_only(value.trim()) {
        return Err(ValidationError::new("digits_only").with_message("权益名称不能只包含数字".into()));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("不能只包含空白字符".into()));
    }
    Ok(())
}

fn validate_future_date(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value <= Utc::now().date_naive() {
        return Err(ValidationError::new("not_future").with_message("日期必须晚于今天".into()));
    }
    Ok(())
}

/// 解析请求中的 UUID
pub fn parse_id(raw: &str) -> Result<Uuid, LedgerError> {
    Uuid::parse_str(raw.trim()).map_err(|_| LedgerError::InvalidId(raw.to_string()))
}

// ==================== 用户 ====================

/// 注册请求
///
/// 角色与初始积分由服务端决定，请求中的 `tipo`/`pontos` 会被忽略
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 100, message = "姓名长度必须在 3-100 之间"),
        custom(function = "validate_person_name")
    )]
    pub nome: String,
    #[validate(
        email(message = "邮箱格式无效"),
        custom(function = "validate_lowercase")
    )]
    pub email: String,
    #[validate(custom(function = "validate_strong_password"))]
    pub senha: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "请输入有效的邮箱"))]
    pub email: String,
    #[validate(length(min = 1, message = "密码不能为空"))]
    pub senha: String,
}

/// 修改密码请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "当前密码不能为空"))]
    pub senha_atual: String,
    #[validate(custom(function = "validate_strong_password"))]
    pub nova_senha: String,
}

/// 设置当前用户积分
#[derive(Debug, Deserialize, Validate)]
pub struct SetPointsRequest {
    #[validate(range(min = 0, message = "积分不能为负数"))]
    pub pontos: i64,
}

/// 设置指定用户积分
#[derive(Debug, Deserialize, Validate)]
pub struct SetUserPointsRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[validate(range(min = 0, message = "积分不能为负数"))]
    pub pontos: i64,
}

// ==================== 权益 ====================

/// 创建权益请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BenefitRequest {
    #[validate(
        length(min = 5, max = 200, message = "权益名称长度必须在 5-200 之间"),
        custom(function = "validate_benefit_name")
    )]
    pub nome: String,
    #[validate(
        length(min = 5, max = 500, message = "地址长度必须在 5-500 之间"),
        custom(function = "validate_not_blank")
    )]
    pub endereco: String,
    #[validate(range(min = 0, message = "积分不能为负数"))]
    pub pontos: i64,
    /// yyyy-mm-dd
    #[validate(custom(function = "validate_future_date"))]
    pub data: NaiveDate,
    #[validate(range(min = 0, message = "数量不能为负数"))]
    pub quantidade: i64,
}

impl BenefitRequest {
    pub fn into_new_benefit(self) -> NewBenefit {
        NewBenefit {
            name: self.nome.trim().to_string(),
            address: self.endereco.trim().to_string(),
            points_cost: self.pontos,
            expires_on: self.data,
            quantity: self.quantidade,
        }
    }
}

/// 更新权益请求（完整替换）
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBenefitRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub benefit: BenefitRequest,
}

/// 设置权益可用数量
#[derive(Debug, Deserialize, Validate)]
pub struct SetQuantityRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[validate(range(min = 0, message = "数量不能为负数"))]
    pub quantidade: i64,
}

/// 权益分页参数
#[derive(Debug, Default, Deserialize)]
pub struct BenefitListQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl BenefitListQuery {
    /// 归一化为 (limit, skip)
    pub fn page(&self) -> (i64, i64) {
        normalize_page(self.limit, self.skip)
    }
}

/// 积分区间查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CostRangeQuery {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl CostRangeQuery {
    pub fn validate_range(&self) -> Result<(), LedgerError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(LedgerError::Validation(format!(
                "min ({min}) 不能大于 max ({max})"
            ))),
            _ => Ok(()),
        }
    }

    pub fn page(&self) -> (i64, i64) {
        normalize_page(self.limit, self.skip)
    }
}

fn normalize_page(limit: Option<i64>, skip: Option<i64>) -> (i64, i64) {
    let limit = match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    };
    let skip = skip.unwrap_or(0).max(0);
    (limit, skip)
}
