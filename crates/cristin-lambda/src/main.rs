//! Lambda entry point for the Cristin project proxy.

mod config;
mod handlers;

use lambda_http::{run, service_fn, Error, Request};
use tracing_subscriber::EnvFilter;

use cristin_client::CristinApiClient;

use crate::handlers::Api;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = config::load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_target(false)
        // CloudWatch attaches its own timestamps.
        .without_time()
        .init();

    let client =
        CristinApiClient::with_base_url(config.request_timeout_secs, &config.cristin_base_url)?;
    let api = Api::new(client, config);
    let api = &api;

    run(service_fn(move |request: Request| async move {
        Ok::<_, Error>(api.handle(&request).await)
    }))
    .await
}
