use async_trait::async_trait;

use crate::model;

pub mod http;
pub mod mock;

/// Issues a single GET and hands back the status with an unread body stream.
/// A non-2xx status is still a response; only failures to obtain a status
/// line are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        request: &model::http::Request,
    ) -> Result<model::http::Response, model::error::StorageError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(
        &self,
        request: &model::http::Request,
    ) -> Result<model::http::Response, model::error::StorageError> {
        (**self).get(request).await
    }
}
