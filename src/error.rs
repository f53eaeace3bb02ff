//! Error taxonomy of the request pipeline.
//!
//! Every failure reaches subscribers as a single terminal `error`
//! notification; nothing is retried or silently dropped. All variants are
//! `Clone` because the multicast operator fans terminal errors out to every
//! subscriber.

use serde_json::Value;
use thiserror::Error;

/// The underlying network operation failed outright (connectivity, DNS,
/// protocol). Carries the transport's own description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Terminal error of an observable request.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
  /// The transport rejected: the request never produced a response.
  #[error("transport failure: {0}")]
  Transport(#[from] TransportError),

  /// A response arrived but its success flag was false. Carries the
  /// configured error handler's output, or the transformed response itself
  /// when no handler is configured (or the handler declined).
  #[error("request failed: {0}")]
  Status(Value),

  /// A body parser, pre-flight hook, or response transformer failed.
  #[error("hook failure: {0}")]
  Hook(String),
}

impl HttpError {
  /// Build a hook failure from any displayable cause.
  pub fn hook(cause: impl std::fmt::Display) -> Self { HttpError::Hook(cause.to_string()) }
}
