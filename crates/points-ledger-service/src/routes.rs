//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use rewards_shared::{observability::middleware as obs_middleware, server};

use crate::{handlers, middleware::auth_middleware, state::AppState};

/// 用户与积分路由
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/usuario",
            post(handlers::auth::register).get(handlers::user::list_users),
        )
        .route("/usuario/login", post(handlers::auth::login))
        .route("/usuario/me", get(handlers::auth::me))
        .route("/usuario/senha", put(handlers::auth::change_password))
        .route("/usuario/id/{id}", get(handlers::user::get_user))
        .route(
            "/usuario/{id}",
            axum::routing::delete(handlers::user::delete_user),
        )
        // 积分余额
        .route(
            "/usuario/pontos",
            get(handlers::points::get_my_points).put(handlers::points::set_my_points),
        )
        .route("/usuario/pontosPut", put(handlers::points::set_user_points))
}

/// 权益路由
fn benefit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/beneficio",
            get(handlers::benefit::list_benefits)
                .post(handlers::benefit::create_benefit)
                .put(handlers::benefit::update_benefit),
        )
        .route(
            "/beneficio/faixa",
            get(handlers::benefit::list_by_cost_range),
        )
        .route("/beneficio/id/{id}", get(handlers::benefit::get_benefit))
        .route(
            "/beneficio/nome/{filtro}",
            get(handlers::benefit::search_by_name),
        )
        .route("/beneficio/resgate", put(handlers::benefit::set_quantity))
        .route(
            "/beneficio/{id}",
            axum::routing::delete(handlers::benefit::delete_benefit),
        )
}

/// 构建完整的 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::auth::service_info))
        .merge(user_routes())
        .merge(benefit_routes())
}

/// 构建带认证与可观测性中间件的应用路由
///
/// 部署入口与测试共用，确保中间件顺序一致。
/// 认证与指标中间件以 `route_layer` 挂载，仅作用于已匹配的路由。
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route(
            "/health",
            get(|| async { server::health_body("points-ledger-service") }),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route_layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
