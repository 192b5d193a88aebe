use crate::domain::upload::image_data::ImageData;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct UploadImageRequest {
    pub image_data: ImageData,
    pub filename: String,
    pub image_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub filename: String,
}
