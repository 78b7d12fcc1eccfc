//! Unreal Texture Core
//!
//! Core types shared by the Unreal texture crates: the declared engine version
//! a cooked asset was built with, the name table that serialized objects refer
//! to, and the common error type.

pub mod error;
pub mod names;
pub mod version;

// Re-export main types
pub use error::{Result, UeAssetError};
pub use names::{NameMap, NameTable};
pub use version::{EngineFork, EngineVersion};
