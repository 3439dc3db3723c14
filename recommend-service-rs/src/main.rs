// recommend-service-rs/src/main.rs
// Main Entry Point for recommend-service

use std::sync::Arc;

use recommend_service::leetcode_client::LeetCodeClient;
use recommend_service::llm_client::LlmClient;
use recommend_service::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = config_rs::get_bind_address("RECOMMEND", config_rs::get_default_port("RECOMMEND"));

    let llm = LlmClient::new();
    if !llm.is_configured() {
        log::warn!("LLM_API_KEY is not set; recommendation requests will fail until it is provided");
    }

    let state = Arc::new(AppState {
        leetcode: LeetCodeClient::new(),
        llm,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!(
        "{} starting on {}",
        config_rs::get_formatted_service_name("RECOMMEND"),
        addr
    );
    println!("Recommend service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
