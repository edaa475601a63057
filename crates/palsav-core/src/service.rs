//! Request handling for the projection REST service.
//!
//! [`ProjectionService`] is transport-agnostic: it takes a method, a URL and a
//! body and returns a [`ServiceResponse`]. The HTTP listener in
//! [`crate::http`] only moves bytes in and out of it.
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::codec::{CustomProperties, DecodeOptions, SaveCodec};
use crate::error::ServiceError;
use crate::json::{self, JsonOpts, NanPolicy};
use crate::mappers::{map_player_save, map_server_save};
use crate::prune::{ModeSelector, SaveMode};

/// Bodies at least this large are gzip-compressed when the client accepts it.
pub const DEFAULT_GZIP_MIN_SIZE: usize = 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ToJsonRequest {
    pub filename: PathBuf,
    #[serde(default = "default_true")]
    pub convert_nan_to_null: bool,
    #[serde(default)]
    pub mode: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// `Some("gzip")` when `body` is compressed
    pub content_encoding: Option<&'static str>,
}

impl ServiceResponse {
    fn json(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            content_encoding: None,
        }
    }

    fn error(err: &ServiceError) -> Self {
        let body = json!({ "detail": err.to_string() }).to_string();
        Self::json(err.status(), body.into_bytes())
    }
}

pub struct ProjectionService {
    codec: Arc<dyn SaveCodec>,
    gzip_min_size: usize,
}

impl ProjectionService {
    pub fn new(codec: Arc<dyn SaveCodec>) -> Self {
        Self {
            codec,
            gzip_min_size: DEFAULT_GZIP_MIN_SIZE,
        }
    }

    pub fn with_gzip_min_size(mut self, size: usize) -> Self {
        self.gzip_min_size = size;
        self
    }

    pub fn handle(&self, method: &str, url: &str, body: &[u8], accepts_gzip: bool) -> ServiceResponse {
        let route = url.split('?').next().unwrap_or(url);
        let resp = match (method, route) {
            ("GET", "/health") => ServiceResponse::json(200, self.health()),
            ("POST", "/to-json") => match self.to_json_bytes(body) {
                Ok(bytes) => ServiceResponse::json(200, bytes),
                Err(e) => {
                    log::warn!("to-json failed: {}", e);
                    ServiceResponse::error(&e)
                }
            },
            (_, "/health") | (_, "/to-json") => {
                let body = json!({ "detail": "Method Not Allowed" }).to_string();
                ServiceResponse::json(405, body.into_bytes())
            }
            _ => {
                let body = json!({ "detail": "Not Found" }).to_string();
                ServiceResponse::json(404, body.into_bytes())
            }
        };
        if accepts_gzip {
            self.compress(resp)
        } else {
            resp
        }
    }

    pub fn health(&self) -> Vec<u8> {
        br#"{"status":"ok"}"#.to_vec()
    }

    fn to_json_bytes(&self, body: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let req: ToJsonRequest = serde_json::from_slice(body)
            .map_err(|e| ServiceError::BadRequest(format!("invalid request body: {}", e)))?;
        let text = self.to_json(&req)?;
        Ok(text.into_bytes())
    }

    /// Decodes `req.filename` and renders it minified, projected per `req.mode`.
    pub fn to_json(&self, req: &ToJsonRequest) -> Result<String, ServiceError> {
        let selector = ModeSelector::parse(req.mode.as_deref())?;
        if !req.filename.is_file() {
            return Err(ServiceError::FileNotFound);
        }
        log::info!(
            "to-json {} mode={}",
            req.filename.display(),
            req.mode.as_deref().unwrap_or("raw")
        );
        let data = std::fs::read(&req.filename)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let nan = NanPolicy::from_convert_to_null(req.convert_nan_to_null);
        let decoded = self.codec.decode(
            &data,
            &DecodeOptions {
                custom_properties: CustomProperties::All,
                nan,
            },
        )?;
        let result = project(decoded.document, selector)?;
        Ok(json::write_document(&result, &JsonOpts::minified(nan)))
    }

    fn compress(&self, resp: ServiceResponse) -> ServiceResponse {
        if resp.body.len() < self.gzip_min_size {
            return resp;
        }
        let mut enc = GzEncoder::new(Vec::new(), GzLevel::default());
        match enc.write_all(&resp.body).and_then(|_| enc.finish()) {
            Ok(gz) => ServiceResponse {
                status: resp.status,
                body: gz,
                content_encoding: Some("gzip"),
            },
            Err(e) => {
                log::warn!("gzip failed, sending plain body: {}", e);
                resp
            }
        }
    }
}

/// Applies the aggregate mapper of the selected mode; `Raw` passes through.
pub fn project(doc: Value, selector: ModeSelector) -> Result<Value, ServiceError> {
    let projected = match selector {
        ModeSelector::Raw => return Ok(doc),
        ModeSelector::Mode(SaveMode::Server) => serde_json::to_value(map_server_save(&doc)),
        ModeSelector::Mode(SaveMode::Player) => serde_json::to_value(map_player_save(&doc)),
    };
    projected.map_err(|e| ServiceError::Internal(e.to_string()))
}
