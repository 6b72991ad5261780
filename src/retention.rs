//! Retention decisions for instance-derived AMIs.
//!
//! Every instance collected by the inventory is matched against the full
//! image list by name prefix. Images whose `DeleteOn` date has been
//! reached are flagged for deregistration; an image named with today's
//! date stamp counts as a fresh backup.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::types::{BackupInstance, OwnedImage};

/// Images generated for an instance carry this marker ahead of the
/// instance id in their name.
pub const IMAGE_NAME_PREFIX: &str = "Lambda - ";

/// Tag holding the date an image becomes eligible for deletion.
pub const DELETE_ON_TAG: &str = "DeleteOn";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Image ids eligible for deregistration, in scan order. Not
    /// de-duplicated: an image matched through several instances shows up
    /// once per match.
    pub doomed: Vec<String>,
    /// Whether any matching image name carries today's date stamp.
    pub backup_success: bool,
}

/// Scan every instance's images against today's date.
///
/// The same in-memory image list is re-scanned for each instance; order
/// of `doomed` follows the instance order, then the image order within
/// each instance.
pub fn evaluate(
    instances: &[BackupInstance],
    images: &[OwnedImage],
    today: NaiveDate,
) -> ScanOutcome {
    let today_stamp = today.format(DATE_FORMAT).to_string();

    // Gate for the destructive pass. Starts open; a matching image
    // stamped with today's date re-confirms it, and nothing ever closes
    // it.
    let mut backup_success = true;
    let mut doomed: Vec<String> = Vec::new();

    // Most recent successfully parsed DeleteOn value, surviving across
    // images and across instances. An image whose tag is missing or
    // malformed is judged against this inherited date, or skipped when no
    // date has been parsed yet.
    // TODO: treat an unparsable DeleteOn as non-expiring instead of
    // inheriting the previous image's date.
    let mut delete_date: Option<NaiveDate> = None;

    for instance in instances {
        let prefix = format!("{}{}", IMAGE_NAME_PREFIX, instance.instance_id);
        let mut image_count = 0usize;

        for image in images {
            if !image.name.starts_with(&prefix) {
                continue;
            }
            image_count += 1;

            if let Some(raw) = image.delete_on.as_deref() {
                match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                    Ok(parsed) => delete_date = Some(parsed),
                    Err(error) => debug!(
                        image_id = %image.image_id,
                        delete_on = %raw,
                        error = %error,
                        "Unparsable DeleteOn tag, falling back to last parsed date"
                    ),
                }
            }

            if let Some(date) = delete_date {
                if date <= today {
                    doomed.push(image.image_id.clone());
                }
            }

            if image.name.ends_with(&today_stamp) {
                backup_success = true;
                info!(date = %today_stamp, "Latest backup from today was a success");
            }
        }

        info!(
            instance_id = %instance.instance_id,
            ami_count = image_count,
            "Evaluated instance images"
        );
    }

    ScanOutcome {
        doomed,
        backup_success,
    }
}
