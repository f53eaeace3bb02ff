//! The observable request pipeline.
//!
//! [`HttpService`](service::HttpService) is an immutable builder: every call
//! returns a new service with a merged [`RequestConfig`](config::RequestConfig)
//! snapshot. `send()` composes the configured request with the async bridge
//! into a cold observable; callers wanting fan-out apply
//! [`share`](crate::ops::share) themselves.

pub mod config;
pub mod encode;
pub mod service;

pub use config::{BeforeSend, BodyParser, CatchError, ConfigPatch, PreFlight, RequestConfig};
pub use service::{Dispatch, HttpService, LifecycleEvent};
