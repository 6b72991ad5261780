use std::env;

use tracing::{info, warn};

/// SNS topic for the cleanup summary. Unset suppresses notification.
pub const ENV_SNS_TOPIC_ARN: &str = "aws_sns_arn";

/// When truthy, destructive calls are logged instead of issued.
pub const ENV_DRY_RUN: &str = "DRY_RUN";

#[derive(Debug, Clone)]
pub struct Config {
    pub sns_topic_arn: Option<String>,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let sns_topic_arn = env::var(ENV_SNS_TOPIC_ARN).ok().filter(|v| !v.is_empty());
        let dry_run = env::var(ENV_DRY_RUN)
            .map(|v| truthy(&v))
            .unwrap_or(false);

        Self {
            sns_topic_arn,
            dry_run,
        }
    }

    pub fn display(&self) {
        info!(
            sns_topic_arn = self
                .sns_topic_arn
                .as_deref()
                .unwrap_or("unset (notifications suppressed)"),
            dry_run = self.dry_run,
            "Configuration initialized"
        );

        if self.dry_run {
            warn!("DRY RUN MODE ENABLED - no images or snapshots will be deleted, only logged");
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_accepted_forms() {
        for value in ["1", "true", "TRUE", "yes", "on", " True "] {
            assert!(truthy(value), "'{}' should enable dry run", value);
        }
    }

    #[test]
    fn test_truthy_rejected_forms() {
        for value in ["", "0", "false", "no", "off", "enabled"] {
            assert!(!truthy(value), "'{}' should not enable dry run", value);
        }
    }
}
