#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;

pub use decoder::ZstdDecoder;
pub use error::ZstdInitError;
