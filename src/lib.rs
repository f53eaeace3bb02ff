//! # rxhttp: a cancellable, multicastable observable request pipeline
//!
//! A small push-based reactive core and an immutable HTTP request builder
//! built on top of it.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use rxhttp::prelude::*;
//!
//! # use futures::executor::LocalPool;
//! # use futures::future::LocalBoxFuture;
//! # let mut pool = LocalPool::new();
//! # let transport: Rc<dyn Transport> = Rc::new(
//! #   |_url: &str, _parts: RequestParts|
//! #    -> LocalBoxFuture<'static, Result<Response, TransportError>> {
//! #     Box::pin(futures::future::ready(Ok(Response::new(200, "pong"))))
//! #   },
//! # );
//! let api = HttpService::new(transport, Rc::new(|_, _| {}), Rc::new(pool.spawner()))
//!   .host("https://example.com");
//!
//! api.get("/ping").send().subscribe(|value| println!("got {value}"));
//! # pool.run();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold, lazy stream; each subscription runs the producer |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` signals |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`HttpService`] | Immutable request builder whose `send` yields an observable |
//!
//! Fan-out is opt-in: pipe any observable through [`ops::share`] to let
//! concurrent subscribers ride one producer run.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`HttpService`]: http::HttpService

pub mod error;
pub mod http;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod subscriber;
pub mod subscription;
pub mod transport;
