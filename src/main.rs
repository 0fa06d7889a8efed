use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod blockchain;
mod config;

use config::NodeConfig;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::home,
        api::handlers::mine,
        api::handlers::full_chain,
        api::handlers::current_transactions,
        api::handlers::new_transaction,
        api::handlers::validate_chain,
        api::handlers::set_difficulty
    ),
    components(
        schemas(
            blockchain::Block,
            blockchain::Transaction,
            api::schema::ChainResponse,
            api::schema::TransactionRequest,
            api::schema::TransactionResponse,
            api::schema::MineResponse,
            api::schema::ValidationResponse,
            api::schema::DifficultyRequest,
            api::schema::DifficultyResponse
        )
    ),
    tags(
        (name = "ledger", description = "Proof-of-work ledger node")
    ),
    info(
        title = "Ledger Node API",
        version = "0.1.0",
        description = "A single-node proof-of-work ledger",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = NodeConfig::from_env()?;

    let ledger = blockchain::Ledger::with_difficulty(config.difficulty);
    let state = web::Data::new(api::AppState::new(ledger, config.mine_timeout));

    info!("Blockchain node {}", state.node_id);
    info!(
        "Starting HTTP server at http://{}:{} (difficulty {})",
        config.host, config.port, config.difficulty
    );

    HttpServer::new(move || {
        // Configure CORS
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(api::configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
