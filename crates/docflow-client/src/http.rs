//! Hosted extraction service client
//!
//! Talks to a schema-driven document extraction API in two steps:
//!
//! 1. `POST {endpoint}/api/v1/files` uploads the raw document (multipart,
//!    `purpose=extract`) and returns a file id.
//! 2. `POST {endpoint}/api/v1/extraction/run` runs extraction over that file
//!    with the category schema rendered as JSON Schema, and returns the
//!    extracted payload under `data`.
//!
//! Each document gets exactly one attempt; there is no retry loop.
//!
//! # Examples
//!
//! ```no_run
//! use docflow_client::HttpExtractionClient;
//!
//! let client = HttpExtractionClient::new("https://api.cloud.llamaindex.ai", "llx-...")
//!     .unwrap()
//!     .with_extraction_mode("BALANCED");
//! ```

use crate::ClientError;
use async_trait::async_trait;
use docflow_domain::traits::ExtractionClient;
use docflow_domain::{ExtractedRecord, ExtractionError, RawDocument, SchemaDescription};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default extraction service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.cloud.llamaindex.ai";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default extraction mode
pub const DEFAULT_EXTRACTION_MODE: &str = "BALANCED";

/// HTTP extraction service client
pub struct HttpExtractionClient {
    endpoint: String,
    api_key: String,
    extraction_mode: String,
    client: reqwest::Client,
}

/// Response from the file upload API
#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

/// Request body for the extraction API
#[derive(Serialize)]
struct ExtractionRunRequest<'a> {
    file_id: &'a str,
    data_schema: Value,
    config: ExtractionRunConfig<'a>,
}

#[derive(Serialize)]
struct ExtractionRunConfig<'a> {
    extraction_mode: &'a str,
}

/// Response from the extraction API
#[derive(Deserialize)]
struct ExtractionRunResponse {
    #[serde(default)]
    data: Option<Value>,
}

impl HttpExtractionClient {
    /// Create a new client with the default request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(endpoint, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new client with a specific request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::Config("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            extraction_mode: DEFAULT_EXTRACTION_MODE.to_string(),
            client,
        })
    }

    /// Set the extraction mode sent with each run (e.g. `FAST`, `BALANCED`)
    pub fn with_extraction_mode(mut self, mode: impl Into<String>) -> Self {
        self.extraction_mode = mode.into();
        self
    }

    /// Service endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn upload(&self, document: &RawDocument) -> Result<String, ClientError> {
        let url = format!("{}/api/v1/files", self.endpoint);

        let part = Part::bytes(document.bytes.clone()).file_name(document.file_name().to_string());
        let form = Form::new().text("purpose", "extract").part("upload_file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Communication(format!("Upload failed: {}", e)))?;

        let upload: UploadResponse = decode(response).await?;
        Ok(upload.id)
    }

    async fn run_extraction(
        &self,
        file_id: &str,
        schema: &SchemaDescription,
    ) -> Result<ExtractionRunResponse, ClientError> {
        let url = format!("{}/api/v1/extraction/run", self.endpoint);

        let request_body = ExtractionRunRequest {
            file_id,
            data_schema: schema.to_json_schema(),
            config: ExtractionRunConfig {
                extraction_mode: &self.extraction_mode,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ClientError::Communication(format!("Extraction request failed: {}", e)))?;

        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Communication(format!("Failed to read response: {}", e)))?;
    serde_json::from_slice(&body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// Turn the `data` payload of a service response into a record
///
/// A missing, null or empty payload is `NoDataInResponse`; a payload that
/// fails [`SchemaDescription::conform`] is `SchemaMismatch`.
pub fn interpret_payload(
    data: Option<&Value>,
    schema: &SchemaDescription,
) -> Result<ExtractedRecord, ExtractionError> {
    let data = match data {
        None | Some(Value::Null) => {
            return Err(ExtractionError::no_data("response carried no data"));
        }
        Some(Value::Object(map)) if map.is_empty() => {
            return Err(ExtractionError::no_data("response data is empty"));
        }
        Some(data) => data,
    };

    schema
        .conform(data)
        .map_err(|violation| ExtractionError::schema_mismatch(violation.to_string()))
}

#[async_trait]
impl ExtractionClient for HttpExtractionClient {
    async fn extract(
        &self,
        document: &RawDocument,
        schema: &SchemaDescription,
    ) -> Result<ExtractedRecord, ExtractionError> {
        let file_id = self.upload(document).await?;
        debug!("Uploaded {} as file {}", document.file_name(), file_id);

        let response = self.run_extraction(&file_id, schema).await?;
        interpret_payload(response.data.as_ref(), schema)
    }

    fn name(&self) -> &str {
        "http"
    }
}
