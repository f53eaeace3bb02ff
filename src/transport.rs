//! The transport seam: an opaque asynchronous network operation.
//!
//! The pipeline never performs I/O itself. A [`Transport`] receives the final
//! URL and an outgoing [`RequestParts`] snapshot and returns a future that
//! settles with a [`Response`] or a [`TransportError`]. Implementations plug
//! in real HTTP clients; tests plug in closures.

use std::collections::BTreeMap;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::error::{HttpError, TransportError};

/// The outgoing request snapshot handed to the transport, rebuilt for every
/// subscription of the request observable.
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
  pub method: String,
  pub headers: BTreeMap<String, String>,
  pub body: Option<Value>,
  pub credentials: Option<String>,
  pub mode: Option<String>,
}

/// A raw transport response: a status code and an unread body.
#[derive(Debug, Clone)]
pub struct Response {
  status: u16,
  body: String,
}

impl Response {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self { status, body: body.into() }
  }

  /// The transport's own success flag; 2xx statuses count as success.
  pub fn ok(&self) -> bool { (200..300).contains(&self.status) }

  pub fn status(&self) -> u16 { self.status }

  /// Read the body as text.
  pub fn into_text(self) -> String { self.body }

  /// Read the body as JSON.
  pub fn json(&self) -> Result<Value, HttpError> {
    serde_json::from_str(&self.body).map_err(HttpError::hook)
  }
}

/// An asynchronous network operation.
pub trait Transport {
  fn send(
    &self,
    url: &str,
    parts: RequestParts,
  ) -> LocalBoxFuture<'static, Result<Response, TransportError>>;
}

/// Any matching closure is a transport; keeps mocks one line long.
impl<F> Transport for F
where
  F: Fn(&str, RequestParts) -> LocalBoxFuture<'static, Result<Response, TransportError>>,
{
  fn send(
    &self,
    url: &str,
    parts: RequestParts,
  ) -> LocalBoxFuture<'static, Result<Response, TransportError>> {
    self(url, parts)
  }
}

/// Response transformers: how a raw [`Response`] becomes the delivered value.
pub mod response {
  use std::rc::Rc;

  use super::*;

  /// Shared transformer from raw response to delivered value.
  pub type ResponseTransform = Rc<dyn Fn(Response) -> Result<Value, HttpError>>;

  /// Deliver the body as a string. The default when none is configured.
  pub fn as_text() -> ResponseTransform { Rc::new(|res| Ok(Value::String(res.into_text()))) }

  /// Parse the body as JSON; a parse failure is a hook failure.
  pub fn as_json() -> ResponseTransform { Rc::new(|res| res.json()) }
}
