//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::{HttpError, TransportError};
// Request pipeline
pub use crate::http::{
  BeforeSend, BodyParser, CatchError, ConfigPatch, Dispatch, HttpService, LifecycleEvent,
  PreFlight, RequestConfig,
};
// Observer trait and adapters
pub use crate::observer::{Observer, ObserverAll, ObserverErr, ObserverNext};
// Operators
pub use crate::ops::share;
// Subscription
pub use crate::subscription::{SubscriptionLike, TearDown};
pub use crate::{
  observable::{from_async, of, throw, AsyncHooks, BoxedObservable, Observable},
  subscriber::Subscriber,
  subscription::Subscription,
  transport::{
    response::{as_json, as_text, ResponseTransform},
    RequestParts, Response, Transport,
  },
};
