//! Scheduled cleanup of tagged AMIs and their backing EBS snapshots.
//!
//! One invocation collects the instances tagged for backup, correlates
//! their generated images against the `DeleteOn` retention tag, and, when a
//! fresh backup exists for today, deregisters the expired images and
//! deletes the snapshots that reference them. A summary is published to an
//! SNS topic when one is configured.

pub mod aws;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod handler;
pub mod inventory;
pub mod logging;
pub mod notify;
pub mod retention;
pub mod types;
