//! The immutable request builder and its `send` orchestration.

use std::{collections::BTreeMap, rc::Rc};

use futures::task::LocalSpawn;
use serde_json::Value;

use crate::{
  error::HttpError,
  http::{
    config::{BeforeSend, BodyParser, CatchError, ConfigPatch, PreFlight, RequestConfig},
    encode::form_urlencode,
  },
  observable::{self, from_async, AsyncHooks, BoxedObservable},
  transport::{
    response::{self, ResponseTransform},
    RequestParts, Transport,
  },
};

/// A lifecycle notification pushed to the dispatch sink. Every executed
/// request dispatches `Request` exactly once, then exactly one of `Success`
/// or `Failure`.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
  /// The request is about to start; carries the outgoing body.
  Request(Option<Value>),
  /// The request succeeded; carries the delivered value.
  Success(Value),
  /// The request failed; carries the delivered error.
  Failure(HttpError),
}

/// Fire-and-forget sink for lifecycle events.
pub type Dispatch = Rc<dyn Fn(&str, LifecycleEvent)>;

/// Immutable request builder. Every method returns a new service whose
/// config is the parent merged with one override fragment; the parent stays
/// usable as a template for further requests.
#[derive(Clone)]
pub struct HttpService {
  config: RequestConfig,
  transport: Rc<dyn Transport>,
  dispatch: Dispatch,
  spawner: Rc<dyn LocalSpawn>,
}

impl HttpService {
  pub fn new(transport: Rc<dyn Transport>, dispatch: Dispatch, spawner: Rc<dyn LocalSpawn>) -> Self {
    Self { config: RequestConfig::default(), transport, dispatch, spawner }
  }

  pub fn config(&self) -> &RequestConfig { &self.config }

  /// Core builder step: a new service with `patch` merged over this config.
  pub fn request(&self, patch: ConfigPatch) -> Self {
    Self {
      config: self.config.merged(patch),
      transport: self.transport.clone(),
      dispatch: self.dispatch.clone(),
      spawner: self.spawner.clone(),
    }
  }

  pub fn host(&self, host: impl Into<String>) -> Self {
    self.request(ConfigPatch { host: Some(host.into()), ..Default::default() })
  }

  pub fn url(&self, url: impl Into<String>) -> Self {
    self.request(ConfigPatch { url: Some(url.into()), ..Default::default() })
  }

  /// Replace the whole header map.
  pub fn headers(&self, headers: BTreeMap<String, String>) -> Self {
    self.request(ConfigPatch { headers: Some(headers), ..Default::default() })
  }

  /// Set one header, keeping the rest. Keys are case-sensitive as supplied.
  pub fn header(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut headers = self.config.headers.clone();
    headers.insert(key.into(), value.into());
    self.headers(headers)
  }

  pub fn method(&self, method: impl Into<String>, url: impl Into<String>) -> Self {
    self.request(ConfigPatch {
      method: Some(method.into()),
      url: Some(url.into()),
      ..Default::default()
    })
  }

  pub fn get(&self, url: impl Into<String>) -> Self { self.method("GET", url) }

  pub fn post(&self, url: impl Into<String>) -> Self { self.method("POST", url) }

  pub fn put(&self, url: impl Into<String>) -> Self { self.method("PUT", url) }

  pub fn delete(&self, url: impl Into<String>) -> Self { self.method("DELETE", url) }

  pub fn patch(&self, url: impl Into<String>) -> Self { self.method("PATCH", url) }

  pub fn head(&self, url: impl Into<String>) -> Self { self.method("HEAD", url) }

  pub fn options(&self, url: impl Into<String>) -> Self { self.method("OPTIONS", url) }

  pub fn query(&self, query: BTreeMap<String, Value>) -> Self {
    self.request(ConfigPatch { query: Some(query), ..Default::default() })
  }

  pub fn body(&self, body: Value) -> Self {
    self.request(ConfigPatch { body: Some(body), ..Default::default() })
  }

  pub fn credentials(&self, credentials: impl Into<String>) -> Self {
    self.request(ConfigPatch { credentials: Some(credentials.into()), ..Default::default() })
  }

  pub fn mode(&self, mode: impl Into<String>) -> Self {
    self.request(ConfigPatch { mode: Some(mode.into()), ..Default::default() })
  }

  pub fn body_parser(&self, parser: BodyParser) -> Self {
    self.request(ConfigPatch { body_parser: Some(parser), ..Default::default() })
  }

  pub fn response(&self, transform: ResponseTransform) -> Self {
    self.request(ConfigPatch { response: Some(transform), ..Default::default() })
  }

  pub fn catch_error(&self, handler: CatchError) -> Self {
    self.request(ConfigPatch { catch_error: Some(handler), ..Default::default() })
  }

  pub fn pre_flight(&self, hook: PreFlight) -> Self {
    self.request(ConfigPatch { pre_flight: Some(hook), ..Default::default() })
  }

  pub fn on_before_send(&self, hook: BeforeSend) -> Self {
    self.request(ConfigPatch { on_before_send: Some(hook), ..Default::default() })
  }

  /// Execute the accumulated config as a cold observable request.
  ///
  /// Each subscription runs the before-send hook, dispatches
  /// `"{METHOD} {URL}.REQUEST"`, performs the network call, and delivers the
  /// transformed response or the classified error, dispatching `.SUCCESS` or
  /// `.FAILURE` along the way. A body-parser or pre-flight failure surfaces
  /// as an observable that errors on subscribe without starting the request.
  pub fn send(&self) -> BoxedObservable<Value, HttpError> {
    match self.prepare() {
      Ok(prepared) => self.bridge(prepared),
      Err(err) => {
        tracing::debug!(error = %err, "request preparation failed");
        observable::throw(err).boxed()
      }
    }
  }

  /// Steps 1..=6 of `send`: everything that happens before the bridge.
  fn prepare(&self) -> Result<Prepared, HttpError> {
    let mut config = self.config.clone();

    let mut url = format!(
      "{}{}",
      config.host.as_deref().unwrap_or_default(),
      config.url.as_deref().unwrap_or_default()
    );
    if let Some(query) = &config.query {
      let params = form_urlencode(query);
      if !params.is_empty() {
        url.push('?');
        url.push_str(&params);
      }
    }

    if let Some(body) = config.body.clone() {
      let parsed = match &config.body_parser {
        Some(parser) => parser(body, &config)?,
        None => body,
      };
      config.body = Some(parsed);
    }

    if let Some(pre_flight) = config.pre_flight.clone() {
      config = config.merged(pre_flight(&config)?);
    }

    // A body-less request must not claim a payload type.
    if config.body.is_none() {
      config.headers.retain(|key, _| !key.eq_ignore_ascii_case("content-type"));
    }

    let method = config.method.clone().unwrap_or_else(|| "GET".to_string());
    tracing::debug!(method = %method, url = %url, "prepared request");
    Ok(Prepared { method, url, config })
  }

  /// Step 7: wrap the network call with lifecycle hooks.
  fn bridge(&self, prepared: Prepared) -> BoxedObservable<Value, HttpError> {
    let Prepared { method, url, config } = prepared;
    let config = Rc::new(config);

    let request_event = format!("{method} {url}.REQUEST");
    let success_event = format!("{method} {url}.SUCCESS");
    let failure_event = format!("{method} {url}.FAILURE");

    let transform = config.response.clone().unwrap_or_else(response::as_text);
    let catch_error = config.catch_error.clone();
    let parts = RequestParts {
      method,
      headers: config.headers.clone(),
      body: config.body.clone(),
      credentials: config.credentials.clone(),
      mode: config.mode.clone(),
    };

    let hooks = AsyncHooks {
      on_start: Some(Box::new({
        let dispatch = self.dispatch.clone();
        let config = config.clone();
        let body = config.body.clone();
        move || {
          if let Some(hook) = &config.on_before_send {
            hook(&config);
          }
          dispatch(&request_event, LifecycleEvent::Request(body.clone()));
        }
      })),
      on_success: Some(Box::new({
        let dispatch = self.dispatch.clone();
        move |value: &Value| dispatch(&success_event, LifecycleEvent::Success(value.clone()))
      })),
      on_failure: Some(Box::new({
        let dispatch = self.dispatch.clone();
        move |err: &HttpError| dispatch(&failure_event, LifecycleEvent::Failure(err.clone()))
      })),
    };

    let transport = self.transport.clone();
    let factory = move || {
      let transport = transport.clone();
      let url = url.clone();
      let parts = parts.clone();
      let transform = transform.clone();
      let catch_error = catch_error.clone();
      async move {
        let response = transport.send(&url, parts).await.map_err(HttpError::from)?;
        // Classify on the transport's own flag before transforming.
        let ok = response.ok();
        let value = transform(response)?;
        if ok {
          Ok(value)
        } else {
          let raised = catch_error.as_ref().and_then(|handler| handler(&value)).unwrap_or(value);
          Err(HttpError::Status(raised))
        }
      }
    };

    from_async(factory, hooks, self.spawner.clone()).boxed()
  }
}

struct Prepared {
  method: String,
  url: String,
  config: RequestConfig,
}
