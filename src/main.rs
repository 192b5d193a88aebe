use anyhow::Context;
use s3_image_upload::{
    application::upload_image::{dto::UploadImageRequest, use_case::UploadImageUseCase},
    config::Config,
    domain::upload::image_data::ImageData,
    infrastructure::{
        storage::s3_image_uploader::S3ImageUploader, transport::reqwest_transport::ReqwestTransport,
    },
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise debug output for this crate only
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,s3_image_upload=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let signed_request = tokio::fs::read_to_string(&config.signed_policy_path)
        .await
        .with_context(|| format!("reading signed policy {}", config.signed_policy_path.display()))?;
    let image = tokio::fs::read(&config.image_path)
        .await
        .with_context(|| format!("reading image {}", config.image_path.display()))?;

    let transport = Arc::new(ReqwestTransport::new(
        config.upload_timeout(),
        &config.upload_user_agent,
    )?);
    let uploader = S3ImageUploader::from_json(&signed_request, transport)?;
    let mut use_case = UploadImageUseCase::new(Box::new(uploader));

    let response = use_case
        .execute(UploadImageRequest {
            image_data: ImageData::from(image),
            filename: config.image_filename.clone(),
            image_format: config.image_format.clone(),
        })
        .await?;

    tracing::info!("UPLOAD COMPLETE: {}", response.filename);
    println!("{}", response.url);
    Ok(())
}
