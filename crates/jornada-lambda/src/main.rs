use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use jornada_lambda::config::LambdaConfig;
use jornada_lambda::state::AppState;
use jornada_storage::s3::S3Store;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = LambdaConfig::from_env();
    let verifier = config.token_verifier()?;
    tracing::info!(bucket = %config.bucket, region = %config.region, "starting");

    let client = jornada_storage::client::build_client(&config.region).await;
    let store = Arc::new(S3Store::new(client, config.bucket));

    let state = AppState {
        catalog: store.clone(),
        enrollments: store,
        verifier,
    };

    lambda_http::run(jornada_lambda::app(state))
        .await
        .map_err(|e| eyre::eyre!(e))
}
