use actix_web::web;

use super::handlers;

/// Configures the API routes
///
/// # Arguments
///
/// * `cfg` - The service configuration
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/mine", web::get().to(handlers::mine))
        .route("/chain", web::get().to(handlers::full_chain))
        .route("/transactions/current", web::get().to(handlers::current_transactions))
        .route("/transactions/new", web::post().to(handlers::new_transaction))
        .route("/validate", web::get().to(handlers::validate_chain))
        .route("/difficulty", web::put().to(handlers::set_difficulty));
}
