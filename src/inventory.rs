//! Read-only collection of instances, images, and snapshots.

use anyhow::{Context, Result};
use aws_sdk_ec2::types::{Filter, Image, Reservation, Snapshot};
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

use crate::retention::DELETE_ON_TAG;
use crate::types::{BackupInstance, OwnedImage, OwnedSnapshot};

/// DescribeSnapshots is issued once with this page size and never
/// paginated further. Accounts holding more snapshots than this are only
/// partially scanned.
const SNAPSHOT_PAGE_SIZE: i32 = 1000;

/// All instances carrying a backup-indicating tag key, in either case
/// form.
pub async fn backup_instances(ec2: &Ec2Client) -> Result<Vec<BackupInstance>> {
    let filter = Filter::builder()
        .name("tag-key")
        .values("backup")
        .values("Backup")
        .build();

    let response = ec2
        .describe_instances()
        .filters(filter)
        .send()
        .await
        .context("Failed to describe backup-tagged instances")?;

    Ok(collect_instances(response.reservations()))
}

/// All images owned by the caller, fetched once ahead of the per-instance
/// scan.
pub async fn owned_images(ec2: &Ec2Client) -> Result<Vec<OwnedImage>> {
    let response = ec2
        .describe_images()
        .owners("self")
        .send()
        .await
        .context("Failed to describe self-owned images")?;

    let images: Vec<OwnedImage> = response.images().iter().filter_map(image_record).collect();

    debug!(image_count = images.len(), "Fetched self-owned images");
    Ok(images)
}

/// First page of snapshots owned by the given account.
pub async fn account_snapshots(ec2: &Ec2Client, account_id: &str) -> Result<Vec<OwnedSnapshot>> {
    let response = ec2
        .describe_snapshots()
        .max_results(SNAPSHOT_PAGE_SIZE)
        .owner_ids(account_id)
        .send()
        .await
        .context("Failed to describe account snapshots")?;

    let snapshots: Vec<OwnedSnapshot> = response
        .snapshots()
        .iter()
        .filter_map(snapshot_record)
        .collect();

    debug!(snapshot_count = snapshots.len(), "Fetched account snapshots");
    Ok(snapshots)
}

fn collect_instances(reservations: &[Reservation]) -> Vec<BackupInstance> {
    reservations
        .iter()
        .flat_map(|reservation| reservation.instances())
        .filter_map(|instance| instance.instance_id())
        .map(|instance_id| BackupInstance {
            instance_id: instance_id.to_string(),
        })
        .collect()
}

/// An image without an id or a name cannot take part in the scan and is
/// dropped here.
fn image_record(image: &Image) -> Option<OwnedImage> {
    let image_id = image.image_id()?.to_string();
    let name = image.name()?.to_string();

    let delete_on = image
        .tags()
        .iter()
        .find(|tag| tag.key() == Some(DELETE_ON_TAG))
        .and_then(|tag| tag.value())
        .map(str::to_string);

    Some(OwnedImage {
        image_id,
        name,
        delete_on,
    })
}

fn snapshot_record(snapshot: &Snapshot) -> Option<OwnedSnapshot> {
    let snapshot_id = snapshot.snapshot_id()?.to_string();
    let description = snapshot.description().unwrap_or_default().to_string();

    Some(OwnedSnapshot {
        snapshot_id,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{Instance, Tag};

    fn tag(key: &str, value: &str) -> Tag {
        Tag::builder().key(key).value(value).build()
    }

    #[test]
    fn test_collect_instances_flattens_reservations() {
        let reservations = vec![
            Reservation::builder()
                .instances(Instance::builder().instance_id("i-0001").build())
                .instances(Instance::builder().instance_id("i-0002").build())
                .build(),
            Reservation::builder()
                .instances(Instance::builder().instance_id("i-0003").build())
                .build(),
        ];

        let instances = collect_instances(&reservations);

        assert_eq!(
            instances
                .iter()
                .map(|i| i.instance_id.as_str())
                .collect::<Vec<_>>(),
            vec!["i-0001", "i-0002", "i-0003"]
        );
    }

    #[test]
    fn test_collect_instances_skips_missing_id() {
        let reservations = vec![Reservation::builder()
            .instances(Instance::builder().build())
            .instances(Instance::builder().instance_id("i-0001").build())
            .build()];

        let instances = collect_instances(&reservations);

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].instance_id, "i-0001");
    }

    #[test]
    fn test_image_record_extracts_delete_on_tag() {
        let image = Image::builder()
            .image_id("ami-0001")
            .name("Lambda - i-0001-2024-05-01")
            .tags(tag("Name", "nightly"))
            .tags(tag(DELETE_ON_TAG, "2024-05-01"))
            .build();

        let record = image_record(&image).expect("image with id and name");

        assert_eq!(record.image_id, "ami-0001");
        assert_eq!(record.name, "Lambda - i-0001-2024-05-01");
        assert_eq!(record.delete_on.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_image_record_without_tags() {
        let image = Image::builder()
            .image_id("ami-0001")
            .name("Lambda - i-0001-2024-05-01")
            .build();

        let record = image_record(&image).expect("image with id and name");

        assert_eq!(record.delete_on, None);
    }

    #[test]
    fn test_image_record_requires_name() {
        let image = Image::builder().image_id("ami-0001").build();

        assert_eq!(image_record(&image), None);
    }

    #[test]
    fn test_snapshot_record_defaults_empty_description() {
        let snapshot = Snapshot::builder().snapshot_id("snap-0001").build();

        let record = snapshot_record(&snapshot).expect("snapshot with id");

        assert_eq!(record.snapshot_id, "snap-0001");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_snapshot_record_requires_id() {
        let snapshot = Snapshot::builder().description("orphan").build();

        assert_eq!(snapshot_record(&snapshot), None);
    }
}
