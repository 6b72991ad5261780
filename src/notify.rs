//! SNS summary notification.

use anyhow::{Context, Result};
use aws_sdk_sns::Client as SnsClient;
use tracing::{info, warn};

/// Publish the cleanup summary to the configured topic. With no topic
/// configured this is a silent no-op; returns whether a publish was
/// issued.
///
/// A response without a message id is logged and tolerated; a failed
/// publish call propagates.
pub async fn publish_summary(
    sns: &SnsClient,
    topic_arn: Option<&str>,
    subject: &str,
    message: &str,
) -> Result<bool> {
    let Some(topic_arn) = topic_arn else {
        return Ok(false);
    };

    info!(topic_arn = %topic_arn, "Sending notification");

    let response = sns
        .publish()
        .target_arn(topic_arn)
        .subject(subject)
        .message(message)
        .send()
        .await
        .context("SNS Publish failed")?;

    match response.message_id() {
        Some(message_id) => {
            info!(message_id = %message_id, "Notification sent");
        }
        None => {
            warn!(
                response = ?response,
                "Notification publish returned no message id"
            );
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sns::config::BehaviorVersion;

    fn offline_client() -> SnsClient {
        // Never sends: every test path returns before an operation is
        // dispatched.
        let config = aws_sdk_sns::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        SnsClient::from_conf(config)
    }

    #[tokio::test]
    async fn test_unset_topic_is_a_no_op() {
        let published = publish_summary(&offline_client(), None, "subject", "message")
            .await
            .expect("no-op path never fails");

        assert!(!published);
    }
}
