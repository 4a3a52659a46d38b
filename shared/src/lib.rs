pub mod config;
pub mod cors;
pub mod types;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

pub use config::Config;

/// Clients and settings shared by every invocation of the Lambda
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub config: Config,
}

impl AppState {
    /// Build AWS clients from the ambient environment (region, credentials)
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_from_env().await;
        let config = Config::from_env();
        tracing::info!(
            "🔧 AppState ready: table={}, bucket={}, origins={:?}",
            config.table_name,
            config.bucket_name,
            config.allowed_origins
        );

        Self {
            dynamo_client: DynamoClient::new(&aws_config),
            s3_client: S3Client::new(&aws_config),
            config,
        }
    }
}
