use reqwest::{Client, Response, StatusCode, header::AUTHORIZATION, multipart};
use tracing::debug;

use crate::error::{Result, UploadError};

const CHUNK_FIELD_NAME: &str = "file";
const CHUNK_CONTENT_TYPE: &str = "application/octet-stream";

/// Whether the server already holds a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Exists,
    Missing,
}

/// The two requests the chunk protocol is made of.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Asks the server whether the chunk addressed by `url` is already stored.
    async fn probe_chunk(&self, url: &str) -> Result<ProbeResult>;

    /// Sends one chunk as a multipart `file` field and returns the response body.
    async fn upload_chunk(&self, url: &str, file_name: &str, data: Vec<u8>) -> Result<String>;
}

pub struct HttpTransport {
    client: Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

impl Transport for HttpTransport {
    async fn probe_chunk(&self, url: &str) -> Result<ProbeResult> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        debug!(%url, %status, "probed chunk");

        match status {
            StatusCode::OK => Ok(ProbeResult::Exists),
            StatusCode::NOT_FOUND => Ok(ProbeResult::Missing),
            _ => Err(remote_error(response).await),
        }
    }

    async fn upload_chunk(&self, url: &str, file_name: &str, data: Vec<u8>) -> Result<String> {
        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(CHUNK_CONTENT_TYPE)?;
        let form = multipart::Form::new().part(CHUNK_FIELD_NAME, part);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!(%url, %status, "uploaded chunk");

        if status != StatusCode::OK {
            return Err(remote_error(response).await);
        }

        Ok(response.text().await?)
    }
}

async fn remote_error(response: Response) -> UploadError {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => UploadError::Remote { status, body },
        Err(e) => e.into(),
    }
}
