pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

use axum::Router;
use my_medi_domain::config::AppConfig;

/// Create the application router
pub fn create_application(config: AppConfig) -> Router {
    routes::create_app(state::AppState::from_config(config))
}
