use crate::{
    application::upload_image::dto::{UploadImageRequest, UploadImageResponse},
    domain::{
        shared::uri::{sanitize_filename, uri_filename},
        upload::errors::UploadError,
    },
    infrastructure::storage::traits::ImageUploader,
};
use tracing::{error, info, instrument};

/// Uploads one image through an [`ImageUploader`], normalizing the filename
/// first.
///
/// Filenames often arrive as archive paths (`word/media/image1.png`) or with a
/// timestamp prefix added by an earlier export; only the bare image name is
/// sent to storage.
pub struct UploadImageUseCase {
    uploader: Box<dyn ImageUploader>,
}

impl UploadImageUseCase {
    pub fn new(uploader: Box<dyn ImageUploader>) -> Self {
        Self { uploader }
    }

    #[instrument(skip(self, request), fields(
        filename = %request.filename,
        image_size = request.image_data.len()
    ))]
    pub async fn execute(
        &mut self,
        request: UploadImageRequest,
    ) -> Result<UploadImageResponse, UploadError> {
        let filename = sanitize_filename(uri_filename(&request.filename));
        if filename.trim().is_empty() {
            return Err(UploadError::InvalidFilename(request.filename));
        }

        let url = self
            .uploader
            .upload(request.image_data, &filename, request.image_format.as_deref())
            .await
            .map_err(|e| {
                error!("Upload of {} failed: {}", filename, e);
                e
            })?;

        info!("Uploaded {} to {}", filename, url);
        Ok(UploadImageResponse { url, filename })
    }
}
