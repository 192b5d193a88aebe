pub mod errors;
pub mod image_data;
pub mod policy;
pub mod value_objects;
