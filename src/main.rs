use lambda_runtime::{run, service_fn, Error};

use ami_retention::aws::AwsClients;
use ami_retention::config::Config;
use ami_retention::handler;
use ami_retention::logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        "AMI retention cleanup starting"
    );

    let config = Config::from_env();
    config.display();

    let clients = AwsClients::new().await;

    run(service_fn(|event| handler::handle(&clients, &config, event))).await
}
