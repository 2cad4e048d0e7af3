use crate::{domain::requests::ImageFile, errors::ServiceError};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

pub type DynImageUploader = Arc<dyn ImageUploaderTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait ImageUploaderTrait {
    /// Uploads one image and returns its public HTTPS URL.
    async fn upload(&self, image: &ImageFile) -> Result<String, ServiceError>;
}
