//! Request configuration snapshots.
//!
//! A [`RequestConfig`] is the immutable state accumulated by the builder.
//! Each builder step produces a parent config merged with a [`ConfigPatch`]
//! fragment: whole-value per field, patch wins. Header key-by-key merging is
//! performed by the `header` builder, which inserts into a copy of the parent
//! map before patching the map as a whole. Hooks are shared closures, so
//! cloning a config is cheap.

use std::{collections::BTreeMap, rc::Rc};

use serde_json::Value;

use crate::{error::HttpError, transport::response::ResponseTransform};

/// Transforms the configured body into the outgoing body.
pub type BodyParser = Rc<dyn Fn(Value, &RequestConfig) -> Result<Value, HttpError>>;

/// Maps a failed response's transformed value into the raised error value;
/// `None` keeps the transformed value itself.
pub type CatchError = Rc<dyn Fn(&Value) -> Option<Value>>;

/// Runs once per send, after body parsing; its patch is shallow-merged over
/// the config before dispatch.
pub type PreFlight = Rc<dyn Fn(&RequestConfig) -> Result<ConfigPatch, HttpError>>;

/// Side effect invoked synchronously right before the request starts.
pub type BeforeSend = Rc<dyn Fn(&RequestConfig)>;

/// Immutable snapshot of accumulated request options.
#[derive(Clone, Default)]
pub struct RequestConfig {
  pub(crate) host: Option<String>,
  pub(crate) url: Option<String>,
  pub(crate) method: Option<String>,
  pub(crate) headers: BTreeMap<String, String>,
  pub(crate) body: Option<Value>,
  pub(crate) query: Option<BTreeMap<String, Value>>,
  pub(crate) credentials: Option<String>,
  pub(crate) mode: Option<String>,
  pub(crate) body_parser: Option<BodyParser>,
  pub(crate) response: Option<ResponseTransform>,
  pub(crate) catch_error: Option<CatchError>,
  pub(crate) pre_flight: Option<PreFlight>,
  pub(crate) on_before_send: Option<BeforeSend>,
}

impl RequestConfig {
  pub fn host(&self) -> Option<&str> { self.host.as_deref() }

  pub fn url(&self) -> Option<&str> { self.url.as_deref() }

  pub fn method(&self) -> Option<&str> { self.method.as_deref() }

  pub fn headers(&self) -> &BTreeMap<String, String> { &self.headers }

  pub fn body(&self) -> Option<&Value> { self.body.as_ref() }

  pub fn query(&self) -> Option<&BTreeMap<String, Value>> { self.query.as_ref() }

  pub fn credentials(&self) -> Option<&str> { self.credentials.as_deref() }

  pub fn mode(&self) -> Option<&str> { self.mode.as_deref() }

  /// Parent merged with an override fragment; the fragment wins per field.
  pub fn merged(&self, patch: ConfigPatch) -> RequestConfig {
    RequestConfig {
      host: patch.host.or_else(|| self.host.clone()),
      url: patch.url.or_else(|| self.url.clone()),
      method: patch.method.or_else(|| self.method.clone()),
      headers: patch.headers.unwrap_or_else(|| self.headers.clone()),
      body: patch.body.or_else(|| self.body.clone()),
      query: patch.query.or_else(|| self.query.clone()),
      credentials: patch.credentials.or_else(|| self.credentials.clone()),
      mode: patch.mode.or_else(|| self.mode.clone()),
      body_parser: patch.body_parser.or_else(|| self.body_parser.clone()),
      response: patch.response.or_else(|| self.response.clone()),
      catch_error: patch.catch_error.or_else(|| self.catch_error.clone()),
      pre_flight: patch.pre_flight.or_else(|| self.pre_flight.clone()),
      on_before_send: patch.on_before_send.or_else(|| self.on_before_send.clone()),
    }
  }
}

/// An all-optional config fragment: what one builder step, or a pre-flight
/// hook, overrides.
#[derive(Clone, Default)]
pub struct ConfigPatch {
  pub host: Option<String>,
  pub url: Option<String>,
  pub method: Option<String>,
  pub headers: Option<BTreeMap<String, String>>,
  pub body: Option<Value>,
  pub query: Option<BTreeMap<String, Value>>,
  pub credentials: Option<String>,
  pub mode: Option<String>,
  pub body_parser: Option<BodyParser>,
  pub response: Option<ResponseTransform>,
  pub catch_error: Option<CatchError>,
  pub pre_flight: Option<PreFlight>,
  pub on_before_send: Option<BeforeSend>,
}
