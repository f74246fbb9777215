use std::{collections::HashMap, io, sync::Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};

use crate::{adapters, model};

/// Scripted reply for one URL.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// A status line followed by the given chunks. An `Err` chunk fails the
    /// body at that point.
    Response {
        status: u16,
        chunks: Vec<Result<Vec<u8>, String>>,
    },
    /// The request never produces a status line.
    Unreachable(String),
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        MockReply::Response {
            status,
            chunks: vec![Ok(body.as_bytes().to_vec())],
        }
    }

    pub fn chunked(status: u16, chunks: Vec<&[u8]>) -> Self {
        MockReply::Response {
            status,
            chunks: chunks.into_iter().map(|chunk| Ok(chunk.to_vec())).collect(),
        }
    }
}

/// In-memory transport. Unknown URLs answer 404 with an empty body.
#[derive(Default)]
pub struct MockClient {
    pub replies: HashMap<String, MockReply>,
    pub requests: Mutex<Vec<model::http::Request>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, url: &str, reply: MockReply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn recorded(&self) -> Vec<model::http::Request> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl adapters::Transport for MockClient {
    async fn get(
        &self,
        request: &model::http::Request,
    ) -> Result<model::http::Response, model::error::StorageError> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        let reply = self
            .replies
            .get(&request.url)
            .cloned()
            .unwrap_or(MockReply::Response {
                status: 404,
                chunks: Vec::new(),
            });

        match reply {
            MockReply::Unreachable(message) => Err(model::error::StorageError::Transport {
                status: 0,
                message,
            }),
            MockReply::Response { status, chunks } => {
                let chunks = chunks.into_iter().map(|chunk| {
                    chunk
                        .map(Bytes::from)
                        .map_err(|err| io::Error::new(io::ErrorKind::ConnectionReset, err))
                });

                Ok(model::http::Response {
                    status,
                    body: stream::iter(chunks).boxed(),
                })
            }
        }
    }
}
