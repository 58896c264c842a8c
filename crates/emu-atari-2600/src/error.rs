//! Loader errors.

use thiserror::Error;

/// Largest cartridge image the console bus can map without bank switching.
pub const MAX_CARTRIDGE_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image is empty")]
    EmptyImage,
    #[error("cartridge is {len} bytes; images over 4096 bytes need bank switching")]
    CartridgeTooLarge { len: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
