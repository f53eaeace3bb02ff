//! Bridge from a future-returning operation to the stream contract.
//!
//! [`from_async`] turns a zero-argument factory of `Future<Output =
//! Result<Item, Err>>` into a cold observable. Each subscription runs the
//! `on_start` hook synchronously, spawns a fresh future on the injected
//! spawner, and delivers the settlement as `next` + `complete` or `error`.
//!
//! The bridge never aborts an in-flight future: unsubscribing only suppresses
//! delivery (and the settlement hooks), the operation itself runs to
//! completion. Cancellation, timeouts and retries are composition points for
//! the caller.

use std::rc::Rc;

use futures::{future::Future, task::LocalSpawnExt};

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::TearDown,
};

/// Side-effect hooks around one asynchronous operation.
///
/// A fixed-shape configuration passed once to [`from_async`]. The settlement
/// hooks observe the value or error by reference and never replace what the
/// stream delivers.
pub struct AsyncHooks<Item, Err> {
  /// Runs synchronously at subscribe time, before the operation starts.
  pub on_start: Option<Box<dyn Fn()>>,
  /// Runs with the resolved value, before it is delivered.
  pub on_success: Option<Box<dyn Fn(&Item)>>,
  /// Runs with the rejection error, before it is delivered.
  pub on_failure: Option<Box<dyn Fn(&Err)>>,
}

impl<Item, Err> Default for AsyncHooks<Item, Err> {
  fn default() -> Self { Self { on_start: None, on_success: None, on_failure: None } }
}

/// Adapt a promise-shaped operation into an observable.
///
/// Per subscription, in order: `on_start`; the factory builds the future; the
/// future is spawned. On `Ok(v)`: `on_success(&v)`, `next(v)`, `complete()`.
/// On `Err(e)`: `on_failure(&e)`, `error(e)`. A settlement arriving after the
/// consumer unsubscribed is discarded, hooks included.
pub fn from_async<F, Fut, Item, Err, S>(
  factory: F,
  hooks: AsyncHooks<Item, Err>,
  spawner: S,
) -> Observable<impl Fn(Subscriber<Item, Err>) -> TearDown, Item, Err>
where
  F: Fn() -> Fut + 'static,
  Fut: Future<Output = Result<Item, Err>> + 'static,
  Item: 'static,
  Err: 'static,
  S: futures::task::LocalSpawn + 'static,
{
  let hooks = Rc::new(hooks);
  Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
    if let Some(on_start) = &hooks.on_start {
      on_start();
    }
    let future = factory();
    let hooks = hooks.clone();
    let task = async move {
      let settled = future.await;
      if subscriber.is_closed() {
        return;
      }
      match settled {
        Ok(value) => {
          if let Some(on_success) = &hooks.on_success {
            on_success(&value);
          }
          subscriber.next(value);
          subscriber.complete();
        }
        Err(err) => {
          if let Some(on_failure) = &hooks.on_failure {
            on_failure(&err);
          }
          subscriber.error(err);
        }
      }
    };
    if spawner.spawn_local(task).is_err() {
      tracing::warn!("async bridge: executor rejected the task; subscription will never settle");
    }
    TearDown::none()
  })
}
