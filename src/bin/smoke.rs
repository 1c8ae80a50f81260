//! Manual smoke checks against a running server.
//!
//! Hits the public surface only: the liveness payload, the anonymous drink
//! listing, and the expected rejection of an unauthenticated detail request.
//! Set `COFFEESHOP_BASE_URL` to target a non-default server.

use http::StatusCode;
use log::{error, info};

async fn check(
    client: &reqwest::Client,
    base: &str,
    path: &str,
    expected: StatusCode,
) -> u32 {
    match client.get(format!("{}{}", base, path)).send().await {
        Ok(response) if response.status() == expected => {
            info!("GET {} -> {}", path, response.status());
            0
        }
        Ok(response) => {
            error!(
                "GET {} -> {} (expected {})",
                path,
                response.status(),
                expected
            );
            1
        }
        Err(e) => {
            error!("GET {} failed: {}", path, e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let base = std::env::var("COFFEESHOP_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let client = reqwest::Client::new();

    info!("Running smoke checks against {}", base);
    let mut failures = 0;
    failures += check(&client, &base, "/", StatusCode::OK).await;
    failures += check(&client, &base, "/drinks", StatusCode::OK).await;
    failures += check(&client, &base, "/drinks-detail", StatusCode::UNAUTHORIZED).await;

    if failures > 0 {
        error!("{} smoke checks failed", failures);
        std::process::exit(1);
    }
    info!("All smoke checks passed");
}
