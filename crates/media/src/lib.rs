//! Media handling for generated and proxied images: format sniffing, JPEG
//! transcoding, and on-disk storage of delivered results.

pub mod error;
pub mod image_ops;
pub mod store;

pub use {
    error::{Error, Result},
    store::{MediaStore, SavedImage},
};
