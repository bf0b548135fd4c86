//! Hosting platform operations
//!
//! `NotebookPlatform` is the seam between the idle procedure and the cloud:
//! - **describe** — the instance's last modified time, used when the notebook
//!   server reports no sessions
//! - **teardown** — delete the companion Glue dev endpoint, stop the instance
//!
//! `AwsPlatform` implements it with the SageMaker and Glue SDK clients.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sagemaker::error::DisplayErrorContext;
use aws_sdk_sagemaker::primitives::DateTime as SmithyDateTime;
use chrono::{DateTime, Utc};

use crate::config::AwsConfig;
use crate::error::{AutostopError, Result};

#[async_trait]
pub trait NotebookPlatform: Send + Sync {
    /// Last modified time of the notebook instance.
    async fn last_modified_time(&self, instance: &str) -> Result<DateTime<Utc>>;

    async fn delete_dev_endpoint(&self, endpoint: &str) -> Result<()>;

    async fn stop_notebook_instance(&self, instance: &str) -> Result<()>;

    /// Platform name for logging.
    fn name(&self) -> &str;
}

fn platform_error<E>(operation: &'static str, err: E) -> AutostopError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::error!(operation, error = %message, "Platform call failed");
    AutostopError::Platform { operation, message }
}

fn to_utc(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(value.secs(), value.subsec_nanos())
}

#[derive(Debug, Clone)]
pub struct AwsPlatform {
    sagemaker: aws_sdk_sagemaker::Client,
    glue: aws_sdk_glue::Client,
}

impl AwsPlatform {
    /// Load credentials and region from the default provider chain.
    pub async fn from_env(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let shared = loader.load().await;

        Self {
            sagemaker: aws_sdk_sagemaker::Client::new(&shared),
            glue: aws_sdk_glue::Client::new(&shared),
        }
    }

    pub fn from_clients(sagemaker: aws_sdk_sagemaker::Client, glue: aws_sdk_glue::Client) -> Self {
        Self { sagemaker, glue }
    }
}

#[async_trait]
impl NotebookPlatform for AwsPlatform {
    async fn last_modified_time(&self, instance: &str) -> Result<DateTime<Utc>> {
        let output = self
            .sagemaker
            .describe_notebook_instance()
            .notebook_instance_name(instance)
            .send()
            .await
            .map_err(|e| platform_error("DescribeNotebookInstance", e))?;

        output
            .last_modified_time()
            .and_then(to_utc)
            .ok_or_else(|| AutostopError::MissingLastModified {
                instance: instance.to_string(),
            })
    }

    async fn delete_dev_endpoint(&self, endpoint: &str) -> Result<()> {
        self.glue
            .delete_dev_endpoint()
            .endpoint_name(endpoint)
            .send()
            .await
            .map_err(|e| platform_error("DeleteDevEndpoint", e))?;
        Ok(())
    }

    async fn stop_notebook_instance(&self, instance: &str) -> Result<()> {
        self.sagemaker
            .stop_notebook_instance()
            .notebook_instance_name(instance)
            .send()
            .await
            .map_err(|e| platform_error("StopNotebookInstance", e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "aws"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sagemaker::config::{Credentials, Region};
    use chrono::TimeZone;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AMZ_JSON: &str = "application/x-amz-json-1.1";

    fn test_platform(server: &MockServer) -> AwsPlatform {
        let credentials = Credentials::new("AKIDTEST", "secret", None, None, "test");

        let sagemaker = aws_sdk_sagemaker::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials.clone())
            .endpoint_url(server.uri())
            .build();
        let glue = aws_sdk_glue::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_sdk_glue::config::Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(server.uri())
            .build();

        AwsPlatform::from_clients(
            aws_sdk_sagemaker::Client::from_conf(sagemaker),
            aws_sdk_glue::Client::from_conf(glue),
        )
    }

    #[test]
    fn test_to_utc_keeps_subsecond_precision() {
        let smithy = SmithyDateTime::from_secs_and_nanos(1_760_860_800, 250_000_000);
        let expected = Utc.with_ymd_and_hms(2025, 10, 19, 8, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(to_utc(&smithy), Some(expected));
    }

    #[tokio::test]
    async fn test_last_modified_time_from_describe() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "SageMaker.DescribeNotebookInstance"))
            .and(body_json(serde_json::json!({ "NotebookInstanceName": "etl-dev" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", AMZ_JSON)
                    .set_body_json(serde_json::json!({
                        "NotebookInstanceName": "etl-dev",
                        "NotebookInstanceStatus": "InService",
                        "LastModifiedTime": 1_760_860_800
                    })),
            )
            .mount(&mock_server)
            .await;

        let platform = test_platform(&mock_server);
        let modified = platform.last_modified_time("etl-dev").await.unwrap();
        assert_eq!(modified, Utc.with_ymd_and_hms(2025, 10, 19, 8, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_describe_without_last_modified_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", AMZ_JSON)
                    .set_body_json(serde_json::json!({ "NotebookInstanceName": "etl-dev" })),
            )
            .mount(&mock_server)
            .await;

        let platform = test_platform(&mock_server);
        match platform.last_modified_time("etl-dev").await {
            Err(AutostopError::MissingLastModified { instance }) => assert_eq!(instance, "etl-dev"),
            other => panic!("Expected MissingLastModified, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_teardown_calls_hit_expected_targets() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSGlue.DeleteDevEndpoint"))
            .and(body_json(serde_json::json!({ "EndpointName": "glue-dev-01" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", AMZ_JSON)
                    .set_body_json(serde_json::json!({})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "SageMaker.StopNotebookInstance"))
            .and(body_json(serde_json::json!({ "NotebookInstanceName": "etl-dev" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", AMZ_JSON)
                    .set_body_json(serde_json::json!({})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let platform = test_platform(&mock_server);
        platform.delete_dev_endpoint("glue-dev-01").await.unwrap();
        platform.stop_notebook_instance("etl-dev").await.unwrap();
        assert_eq!(platform.name(), "aws");
    }

    #[tokio::test]
    async fn test_service_error_maps_to_platform_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("content-type", AMZ_JSON)
                    .set_body_json(serde_json::json!({
                        "__type": "ValidationException",
                        "message": "Status (Stopped) not in ([InService])"
                    })),
            )
            .mount(&mock_server)
            .await;

        let platform = test_platform(&mock_server);
        match platform.stop_notebook_instance("etl-dev").await {
            Err(AutostopError::Platform { operation, .. }) => {
                assert_eq!(operation, "StopNotebookInstance")
            }
            other => panic!("Expected Platform error, got {:?}", other),
        }
    }
}
