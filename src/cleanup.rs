//! Two-phase destructive pass: deregister flagged AMIs, then delete the
//! snapshots that reference them.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::aws::AwsClients;
use crate::inventory;
use crate::types::OwnedSnapshot;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub images_deregistered: usize,
    pub snapshots_deleted: usize,
}

/// A snapshot belongs to an image when its description embeds the image
/// id past the first byte. An id sitting at the very start of the
/// description does not count.
pub fn snapshot_references_image(description: &str, image_id: &str) -> bool {
    matches!(description.find(image_id), Some(index) if index > 0)
}

/// Process the deletion list in order, duplicates included. Snapshots are
/// fetched once up front; each image is deregistered before its snapshots
/// are deleted. A failed call aborts the remaining loop with everything
/// already deleted left in place.
pub async fn run(clients: &AwsClients, doomed: &[String], dry_run: bool) -> Result<CleanupStats> {
    let account = clients.caller_account().await?;
    let snapshots = inventory::account_snapshots(&clients.ec2, &account).await?;

    info!(
        account = %account,
        snapshot_count = snapshots.len(),
        flagged_images = doomed.len(),
        "Starting AMI cleanup pass"
    );

    let mut stats = CleanupStats::default();

    for image_id in doomed {
        deregister_image(clients, image_id, dry_run).await?;
        stats.images_deregistered += 1;

        for snapshot in &snapshots {
            if snapshot_references_image(&snapshot.description, image_id) {
                delete_snapshot(clients, snapshot, dry_run).await?;
                stats.snapshots_deleted += 1;
            }
        }
    }

    Ok(stats)
}

async fn deregister_image(clients: &AwsClients, image_id: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        warn!(image_id = %image_id, "DRY RUN: would deregister image");
        return Ok(());
    }

    info!(image_id = %image_id, "Deregistering image");

    clients
        .ec2
        .deregister_image()
        .image_id(image_id)
        .send()
        .await
        .context(format!("Failed to deregister image {}", image_id))?;

    Ok(())
}

async fn delete_snapshot(
    clients: &AwsClients,
    snapshot: &OwnedSnapshot,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        warn!(snapshot_id = %snapshot.snapshot_id, "DRY RUN: would delete snapshot");
        return Ok(());
    }

    info!(snapshot_id = %snapshot.snapshot_id, "Deleting snapshot");

    clients
        .ec2
        .delete_snapshot()
        .snapshot_id(&snapshot.snapshot_id)
        .send()
        .await
        .context(format!(
            "Failed to delete snapshot {}",
            snapshot.snapshot_id
        ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_past_start_matches() {
        assert!(snapshot_references_image(
            "Created by CreateImage for ami-0001",
            "ami-0001"
        ));
    }

    #[test]
    fn test_reference_at_start_does_not_match() {
        assert!(!snapshot_references_image(
            "ami-0001 root volume",
            "ami-0001"
        ));
    }

    #[test]
    fn test_exact_description_does_not_match() {
        assert!(!snapshot_references_image("ami-0001", "ami-0001"));
    }

    #[test]
    fn test_absent_reference_does_not_match() {
        assert!(!snapshot_references_image(
            "Created by CreateImage for ami-0002",
            "ami-0001"
        ));
    }

    #[test]
    fn test_empty_description_does_not_match() {
        assert!(!snapshot_references_image("", "ami-0001"));
    }

    #[test]
    fn test_reference_at_offset_one_matches() {
        assert!(snapshot_references_image(" ami-0001", "ami-0001"));
    }
}
