pub mod response;
pub mod s3_image_uploader;
pub mod traits;
pub mod xml;
