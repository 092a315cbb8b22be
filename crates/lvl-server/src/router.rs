use axum::routing::get;
use axum::Router;
use lvl_catalog::Catalog;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HOME: &str = "/";
    pub const LIST: &str = "/list";
    pub const GET: &str = "/get/:id";
    pub const UPLOAD: &str = "/upload/:id";
}

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Catalog,
}

/// Build the axum router with all levelhub endpoints.
pub fn build_router(catalog: Catalog, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route(endpoints::HOME, get(handler::home_handler))
        .route(endpoints::LIST, get(handler::list_handler))
        .route(endpoints::GET, get(handler::get_handler))
        .route(
            endpoints::UPLOAD,
            get(handler::upload_handler).post(handler::upload_handler),
        )
        .with_state(AppState { catalog })
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
