//! Error types for cooked texture parsing

use thiserror::Error;
use ue_texture_core::{EngineVersion, UeAssetError};

/// Result type for texture codec operations
pub type Result<T> = std::result::Result<T, TextureError>;

/// Errors that can occur while reading or rewriting texture platform data
///
/// Structural errors carry the byte offset in the primary stream and the
/// declared engine version, since a wrong version is the usual cause.
#[derive(Error, Debug)]
pub enum TextureError {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core errors
    #[error(transparent)]
    Core(#[from] UeAssetError),

    /// Not enough data
    #[error("Not enough data at offset {offset}: expected {expected}, got {actual}")]
    NotEnoughData {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// Malformed engine string
    #[error("Invalid string at offset {offset}: {message}")]
    InvalidString { offset: u64, message: String },

    /// Anchor not found within the scan bound
    #[error(
        "Parse failed: texture header not found before offset {offset}. Make sure the engine version ({version}) is correct."
    )]
    StructuralScanFailure { offset: u64, version: EngineVersion },

    /// A reserved field held an unexpected value
    #[error(
        "Parse failed: unexpected value {actual} (expected {expected}) at offset {offset}{}. Make sure the engine version ({version}) is correct.",
        reason(.message)
    )]
    UnexpectedReservedValue {
        offset: u64,
        expected: u64,
        actual: u64,
        message: Option<String>,
        version: EngineVersion,
    },

    /// Name id could not be resolved
    #[error(
        "Parse failed: name id {id} at offset {offset} is not in the name table. Make sure the engine version ({version}) is correct."
    )]
    NameTableLookupFailure {
        id: u64,
        offset: u64,
        version: EngineVersion,
    },

    /// Combined mip blob does not split into the declared mips
    #[error(
        "Parse failed: mip data split consumed {consumed} bytes but the combined mip holds {available}. Make sure the engine version ({version}) is correct."
    )]
    MipSplitMismatch {
        consumed: usize,
        available: usize,
        version: EngineVersion,
    },

    /// Pixel format has no interchange mapping
    #[error("Unsupported pixel format. ({0})")]
    UnsupportedPixelFormat(String),

    /// Imported container uses a different pixel format
    #[error("The format does not match. (Asset: {asset}, DDS: {dds})")]
    FormatMismatch { asset: String, dds: String },

    /// Imported container is a different texture type
    #[error("Texture type does not match. (Asset: {asset}, DDS: {dds})")]
    TypeMismatch { asset: String, dds: String },

    /// Interchange file could not be read or written
    #[error("DDS error: {0}")]
    Dds(#[from] ddsfile::Error),

    /// Interchange container is inconsistent
    #[error("Invalid DDS data: {0}")]
    InvalidDds(String),
}

fn reason(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

impl TextureError {
    /// Create a new not enough data error
    pub fn not_enough_data(offset: u64, expected: usize, actual: usize) -> Self {
        Self::NotEnoughData {
            offset,
            expected,
            actual,
        }
    }

    /// Create a new invalid string error
    pub fn invalid_string<S: Into<String>>(offset: u64, message: S) -> Self {
        Self::InvalidString {
            offset,
            message: message.into(),
        }
    }

    /// Create a new unsupported pixel format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedPixelFormat(format.into())
    }

    /// Create a new invalid DDS error
    pub fn invalid_dds<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDds(msg.into())
    }

    /// Check if the same asset may load with a different declared version
    ///
    /// Layout errors on a cooked asset usually mean the version is wrong.
    /// Format and I/O errors will not change with the version.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TextureError::Io(_) => false,
            TextureError::Core(_) => false,
            TextureError::NotEnoughData { .. } => true,
            TextureError::InvalidString { .. } => true,
            TextureError::StructuralScanFailure { .. } => true,
            TextureError::UnexpectedReservedValue { .. } => true,
            TextureError::NameTableLookupFailure { .. } => true,
            TextureError::MipSplitMismatch { .. } => true,
            TextureError::UnsupportedPixelFormat(_) => false,
            TextureError::FormatMismatch { .. } => false,
            TextureError::TypeMismatch { .. } => false,
            TextureError::Dds(_) => false,
            TextureError::InvalidDds(_) => false,
        }
    }
}
