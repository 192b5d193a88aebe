mod helpers;
mod test_s3_upload;
