//! Explicitly constructed AWS clients, one set per invocation host.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sts::Client as StsClient;
use tracing::{debug, info};

use crate::error::CleanupError;

#[derive(Clone)]
pub struct AwsClients {
    pub ec2: Ec2Client,
    pub sts: StsClient,
    pub sns: SnsClient,
    region: String,
}

impl AwsClients {
    /// Build all clients from the default credential chain
    /// (Lambda execution role, env vars, shared config).
    pub async fn new() -> Self {
        debug!("Initializing AWS SDK configuration");

        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let region = config
            .region()
            .map(|r| r.as_ref())
            .unwrap_or("unknown")
            .to_string();

        let clients = Self {
            ec2: Ec2Client::new(&config),
            sts: StsClient::new(&config),
            sns: SnsClient::new(&config),
            region,
        };

        info!(region = %clients.region, "AWS clients initialized");
        clients
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Resolve the caller's account id via STS GetCallerIdentity.
    pub async fn caller_account(&self) -> Result<String> {
        let response = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .context("STS GetCallerIdentity failed")?;

        let account = response
            .account()
            .ok_or(CleanupError::MissingCallerAccount)?
            .to_string();

        debug!(account = %account, "Resolved caller identity");
        Ok(account)
    }
}
