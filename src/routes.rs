// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{admin_guard, auth_guard},
};

// Fotos de produto podem passar do limite padrão de 2 MB do axum
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas que exigem token
    let user_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route(
            "/produtos",
            get(handlers::produtos::list_produtos).post(handlers::produtos::create_produto),
        )
        .route(
            "/produtos/{id}",
            get(handlers::produtos::get_produto)
                .put(handlers::produtos::update_produto)
                .delete(handlers::produtos::delete_produto),
        )
        .route(
            "/vendas",
            get(handlers::vendas::list_vendas).post(handlers::vendas::registrar_venda),
        )
        .route(
            "/vendas/{id}",
            get(handlers::vendas::get_venda).delete(handlers::vendas::cancelar_venda),
        )
        .route(
            "/settings/profit-margin",
            get(handlers::settings::get_profit_margin).put(handlers::settings::update_profit_margin),
        )
        .route("/relatorios/resumo", get(handlers::relatorios::get_resumo))
        .route("/relatorios/top-produtos", get(handlers::relatorios::get_top_produtos))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_guard));

    // Rotas de administração: auth_guard (externo) roda antes do admin_guard
    let admin_routes = Router::new()
        .route("/users/pending", get(handlers::admin::list_pending))
        .route("/users", get(handlers::admin::list_all))
        .route("/users/{id}/approve", post(handlers::admin::approve_user))
        .route("/users/{id}/reject", post(handlers::admin::reject_user))
        .route("/users/{id}/block", post(handlers::admin::block_user))
        .route("/users/{id}/unblock", post(handlers::admin::unblock_user))
        .route("/users/{id}", delete(handlers::admin::delete_user))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), admin_guard))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_guard));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(state.images.dir()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
