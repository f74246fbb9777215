use futures::StreamExt;
use tracing::{error, info, span, Instrument, Level};

use crate::{adapters, model};

pub const DOWNLOAD_SUCCESS_MESSAGE: &str = "File downloaded successfully";

/// Client for one BunnyCDN storage zone.
pub struct BunnyStorage {
    client: Box<dyn adapters::Transport>,
    config: model::storage::ClientConfig,
}

impl BunnyStorage {
    pub fn new(
        client: Box<dyn adapters::Transport>,
        config: model::storage::ClientConfig,
    ) -> Self {
        Self { client, config }
    }

    /// Builds a client backed by `reqwest`, honouring the configured timeout.
    pub fn connect(
        config: model::storage::ClientConfig,
    ) -> Result<Self, model::error::StorageError> {
        let client = adapters::http::build_client(config.timeout())?;

        Ok(Self::new(Box::new(client), config))
    }

    pub fn config(&self) -> &model::storage::ClientConfig {
        &self.config
    }

    fn request(&self, url: String) -> model::http::Request {
        model::http::Request {
            url,
            headers: vec![
                (model::http::HEADER_ACCESS_KEY, self.config.api_key().to_string()),
                (
                    model::http::HEADER_CONTENT_TYPE,
                    model::http::APPLICATION_JSON.to_string(),
                ),
                (
                    model::http::HEADER_ACCEPT,
                    model::http::APPLICATION_JSON.to_string(),
                ),
            ],
        }
    }

    /// Lists the files and directories at the root of the storage zone.
    pub async fn list_objects(
        &self,
    ) -> model::storage::OperationResult<Vec<model::storage::StorageEntry>> {
        self.list_directory("").await
    }

    /// Lists a directory of the storage zone, `""` being the zone root.
    pub async fn list_directory(
        &self,
        path: &str,
    ) -> model::storage::OperationResult<Vec<model::storage::StorageEntry>> {
        let span = span!(Level::INFO, "list_objects", context = "list_objects", path = path);

        async move {
            info!("called");

            match self.fetch_listing(path).await {
                Err(err) => {
                    error!(error_message=%err, error_group="list_objects");
                    model::storage::OperationResult::from(err)
                }
                Ok((status, entries)) => {
                    info!(status = status, count = entries.len(), "listed");
                    model::storage::OperationResult::Success {
                        status,
                        message: format!("Listed {} objects", entries.len()),
                        data: entries,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Downloads one file into memory.
    pub async fn download_file(
        &self,
        file_name: &str,
    ) -> model::storage::OperationResult<Vec<u8>> {
        let span = span!(
            Level::INFO,
            "download_file",
            context = "download_file",
            file_name = file_name
        );

        async move {
            info!("called");

            match self.fetch_file(file_name).await {
                Err(err) => {
                    error!(error_message=%err, error_group="download_file");
                    model::storage::OperationResult::from(err)
                }
                Ok((status, data)) => {
                    info!(status = status, size = data.len(), "downloaded");
                    model::storage::OperationResult::Success {
                        status,
                        message: DOWNLOAD_SUCCESS_MESSAGE.to_string(),
                        data,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// URL of a directory, always ending in `/`.
    fn directory_url(&self, path: &str) -> Result<String, model::error::StorageError> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Ok(self.config.base_url().to_string());
        }

        self.object_url(path, true)
    }

    /// Appends `path` to the base URL one percent-encoded segment at a time.
    fn object_url(&self, path: &str, directory: bool) -> Result<String, model::error::StorageError> {
        let base_url = self.config.base_url();
        let mut url = reqwest::Url::parse(base_url).map_err(|err| {
            model::error::StorageError::Config(format!("invalid base url: {}, {}", base_url, err))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                model::error::StorageError::Config(format!("base url cannot take a path: {}", base_url))
            })?;

            segments.pop_if_empty().extend(path.split('/'));
            if directory {
                segments.push("");
            }
        }

        Ok(url.to_string())
    }

    async fn fetch_listing(
        &self,
        path: &str,
    ) -> Result<(u16, Vec<model::storage::StorageEntry>), model::error::StorageError> {
        let url = self.directory_url(path)?;
        let (status, body) = self.fetch(&url).await?;

        let objects: Vec<model::storage::ListedObject> = serde_json::from_slice(&body)
            .map_err(|err| model::error::StorageError::Parse {
                status,
                source: err,
            })?;

        let entries = objects
            .into_iter()
            .map(model::storage::StorageEntry::from)
            .collect();

        Ok((status, entries))
    }

    async fn fetch_file(&self, file_name: &str) -> Result<(u16, Vec<u8>), model::error::StorageError> {
        if file_name.is_empty() {
            return Err(model::error::StorageError::InvalidArgument(
                "file_name is not specified/missing".to_string(),
            ));
        }

        let url = self.object_url(file_name, false)?;
        self.fetch(&url).await
    }

    /// Sends one GET and drains the body. Empty chunks are skipped; a body
    /// failure keeps the status already received.
    async fn fetch(&self, url: &str) -> Result<(u16, Vec<u8>), model::error::StorageError> {
        let req = self.request(url.to_string());
        let mut resp = self.client.get(&req).await?;
        let status = resp.status;

        if !resp.is_success() {
            return Err(model::error::StorageError::HttpStatus {
                status,
                reason: resp.reason().to_string(),
                url: url.to_string(),
            });
        }

        let mut data = Vec::new();
        while let Some(chunk) = resp.body.next().await {
            let chunk = chunk.map_err(|err| model::error::StorageError::Transport {
                status,
                message: format!("failed to read body of: {}, {}", url, err),
            })?;

            if chunk.is_empty() {
                continue;
            }

            data.extend_from_slice(&chunk);
        }

        Ok((status, data))
    }
}
