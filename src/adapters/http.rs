use std::{io, time::Duration};

use async_trait::async_trait;
use futures::StreamExt;

use crate::{adapters, model};

const USER_AGENT: &str = concat!("bunnystore/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, model::error::StorageError> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|err| model::error::StorageError::Config(format!("failed to create HTTP client: {}", err)))
}

#[async_trait]
impl adapters::Transport for reqwest::Client {
    async fn get(
        &self,
        request: &model::http::Request,
    ) -> Result<model::http::Response, model::error::StorageError> {
        let mut req = reqwest::Client::get(self, &request.url);
        for (name, value) in &request.headers {
            req = req.header(*name, value.as_str());
        }

        let resp = req.send().await.map_err(|err| model::error::StorageError::Transport {
            status: 0,
            message: format!("failed to send request to: {}, {}", request.url, err),
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| io::Error::new(io::ErrorKind::Other, err)))
            .boxed();

        Ok(model::http::Response { status, body })
    }
}
