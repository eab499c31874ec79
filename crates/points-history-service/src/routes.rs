//! 路由配置模块

use axum::{
    Router, middleware,
    routing::{get, post},
};
use rewards_shared::{observability::middleware as obs_middleware, server};

use crate::{handlers, state::AppState};

/// 历史记录路由
///
/// `/hist/pontos` 与 `/hist/transacoes` 优先于 `/hist/{id_user}` 匹配；
/// 用户 id 由积分账本生成的 UUID，不会与这两个字面段冲突。
pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/hist/pontos", post(handlers::record_point))
        .route("/hist/pontos/{id}", get(handlers::point_exists))
        .route("/hist/transacoes", post(handlers::record_transaction))
        .route("/hist/{id_user}", get(handlers::get_history))
        .route("/hist/{id_user}/saldo", get(handlers::get_balance))
}

/// 构建带可观测性中间件的应用路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(history_routes())
        .route(
            "/health",
            get(|| async { server::health_body("points-history-service") }),
        )
        .route_layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
