//! palsav-core: conversion and projection of Palworld save files
//!
//! This crate focuses on a small, well-factored surface:
//! - Codec gateway trait (`.sav` bytes <-> decoded tree) and an external binding
//! - Null-tolerant tree access, whitelist pruning and DTO mappers
//! - JSON text reading/writing with NaN handling
//! - File conversion with overwrite confirmation, and the REST projection service
//!
pub mod codec;
pub mod convert;
pub mod dto;
pub mod error;
pub mod http;
pub mod json;
pub mod mappers;
pub mod path;
pub mod prune;
pub mod service;
pub mod ticks;

/// A decoded save tree: leaves wrapped as `{"value": ..}`, maps as lists of
/// `{"key", "value"}` pairs, any branch possibly absent.
pub type Document = serde_json::Value;

pub use codec::{
    Compression, CustomProperties, DecodeOptions, Decoded, ExternalCodec, SaveCodec, SaveType,
};
pub use convert::{Confirm, Converter, Direction, JsonToSavOpts, SavToJsonOpts, TerminalPrompt};
pub use error::{CodecError, ConvertError, ServiceError};
pub use http::{HttpServer, ServerConfig};
pub use json::{Indent, JsonOpts, NanPolicy};
pub use prune::{ModeSelector, SaveMode};
pub use service::{ProjectionService, ServiceResponse, ToJsonRequest};
