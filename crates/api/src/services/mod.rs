/// Image host client
pub mod image_store;
