use serde::Serialize;

/// Instance carrying a backup-indicating tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInstance {
    pub instance_id: String,
}

/// Self-owned AMI with the raw value of its retention tag, if any.
/// Parsing the value is the correlator's job so a malformed date is
/// handled there, not at collection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedImage {
    pub image_id: String,
    pub name: String,
    pub delete_on: Option<String>,
}

/// Snapshot owned by the caller's account. The description is free text
/// expected to embed the id of the image it backs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedSnapshot {
    pub snapshot_id: String,
    pub description: String,
}

/// Invocation result, returned as the Lambda's JSON value.
#[derive(Debug, Serialize)]
pub struct CleanupSummary {
    pub status: String,
    pub instances_evaluated: usize,
    pub images_flagged: usize,
    pub backup_success: bool,
    pub images_deregistered: usize,
    pub snapshots_deleted: usize,
    pub dry_run: bool,
    pub notified: bool,
}
