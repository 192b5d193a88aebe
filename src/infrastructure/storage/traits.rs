use crate::domain::upload::{errors::UploadError, image_data::ImageData};
use async_trait::async_trait;

/// Something that can put one image into object storage and say where it went.
///
/// Uploaders may cache state derived from their credentials between calls,
/// hence `&mut self`: one instance performs one upload at a time.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Uploads `image_data` as `filename` and returns the object URL.
    ///
    /// `image_format` overrides the format inferred from the filename.
    async fn upload(
        &mut self,
        image_data: ImageData,
        filename: &str,
        image_format: Option<&str>,
    ) -> Result<String, UploadError>;
}
