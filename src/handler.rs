//! Single-invocation pipeline: collect, correlate, clean up, notify.

use anyhow::Result;
use chrono::Utc;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{info, warn};

use crate::aws::AwsClients;
use crate::cleanup::{self, CleanupStats};
use crate::config::Config;
use crate::inventory;
use crate::notify;
use crate::retention;
use crate::types::CleanupSummary;

pub const NOTIFICATION_SUBJECT: &str = "EC2 AMI Cleanup";

/// Lambda entry point. The event payload and context only satisfy the
/// host's calling convention; nothing in the pipeline reads them.
pub async fn handle(
    clients: &AwsClients,
    config: &Config,
    _event: LambdaEvent<Value>,
) -> Result<Value, lambda_runtime::Error> {
    let summary = run_cleanup(clients, config).await?;
    Ok(serde_json::to_value(summary)?)
}

async fn run_cleanup(clients: &AwsClients, config: &Config) -> Result<CleanupSummary> {
    let today = Utc::now().date_naive();

    let instances = inventory::backup_instances(&clients.ec2).await?;
    info!(
        region = clients.region(),
        instance_count = instances.len(),
        "Found instances that need evaluation"
    );

    let images = inventory::owned_images(&clients.ec2).await?;
    let outcome = retention::evaluate(&instances, &images, today);

    info!(flagged = ?outcome.doomed, "About to process flagged AMIs");

    let stats = if outcome.backup_success {
        cleanup::run(clients, &outcome.doomed, config.dry_run).await?
    } else {
        warn!("No current backup found, termination suspended");
        CleanupStats::default()
    };

    let notified = notify::publish_summary(
        &clients.sns,
        config.sns_topic_arn.as_deref(),
        NOTIFICATION_SUBJECT,
        &summary_message(&outcome.doomed),
    )
    .await?;

    Ok(CleanupSummary {
        status: if outcome.backup_success {
            "completed"
        } else {
            "suspended"
        }
        .to_string(),
        instances_evaluated: instances.len(),
        images_flagged: outcome.doomed.len(),
        backup_success: outcome.backup_success,
        images_deregistered: stats.images_deregistered,
        snapshots_deleted: stats.snapshots_deleted,
        dry_run: config.dry_run,
        notified,
    })
}

fn summary_message(doomed: &[String]) -> String {
    format!(
        "Hello,\n \nAMI cleanup has been initiated successfully for {:?} instances",
        doomed
    )
}
