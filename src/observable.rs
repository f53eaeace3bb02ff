//! Cold, lazy observables.
//!
//! An [`Observable`] wraps a subscriber function. Nothing runs at
//! construction; each `subscribe_*` call invokes the function exactly once
//! with a fresh guarded [`Subscriber`] and returns the [`Subscription`]
//! handle. Subscriptions are independent of each other unless the observable
//! is wrapped by [`crate::ops::share`].

use std::marker::PhantomData;

use crate::{
  observer::{Observer, ObserverAll, ObserverErr, ObserverNext},
  subscriber::Subscriber,
  subscription::{Subscription, TearDown},
};

pub mod from_async;
pub use from_async::{from_async, AsyncHooks};

/// A push-based producer of values over time.
pub struct Observable<F, Item, Err> {
  subscribe: F,
  _marker: PhantomData<(Item, Err)>,
}

/// Boxed subscriber function; the erased form of any observable.
pub type SubscribeFn<Item, Err> = Box<dyn Fn(Subscriber<Item, Err>) -> TearDown>;

/// Type-erased observable, so differently-built streams share one type.
pub type BoxedObservable<Item, Err> = Observable<SubscribeFn<Item, Err>, Item, Err>;

impl<F, Item, Err> Observable<F, Item, Err>
where
  F: Fn(Subscriber<Item, Err>) -> TearDown,
  Item: 'static,
  Err: 'static,
{
  /// Wrap a subscriber function. The function is given a guarded observer
  /// and may hand back cleanup as a [`TearDown`]. It is not called here;
  /// only `subscribe_*` runs it.
  pub fn new(subscribe: F) -> Self { Self { subscribe, _marker: PhantomData } }

  /// Subscribe with a full observer. The producer function runs
  /// synchronously before this returns.
  pub fn subscribe_with(&self, observer: impl Observer<Item, Err> + 'static) -> Subscription {
    let subscription = Subscription::default();
    let subscriber = Subscriber::new(observer, subscription.clone());
    let teardown = (self.subscribe)(subscriber);
    subscription.add(teardown);
    subscription
  }

  /// Subscribe with a value handler only. Errors and completion are
  /// silently ignored; use [`subscribe_all`](Self::subscribe_all) for
  /// streams that can fail.
  pub fn subscribe(&self, next: impl FnMut(Item) + 'static) -> Subscription {
    self.subscribe_with(ObserverNext(next))
  }

  /// Subscribe with value and error handlers.
  pub fn subscribe_err(
    &self,
    next: impl FnMut(Item) + 'static,
    error: impl FnMut(Err) + 'static,
  ) -> Subscription {
    self.subscribe_with(ObserverErr { next, error })
  }

  /// Subscribe with handlers for all three notifications.
  pub fn subscribe_all(
    &self,
    next: impl FnMut(Item) + 'static,
    error: impl FnMut(Err) + 'static,
    complete: impl FnMut() + 'static,
  ) -> Subscription {
    self.subscribe_with(ObserverAll { next, error, complete })
  }

  /// Apply an operator. Operators are plain functions from observable to
  /// observable, e.g. `observable.pipe(share)`.
  #[inline]
  pub fn pipe<R>(self, op: impl FnOnce(Self) -> R) -> R { op(self) }

  /// Erase the concrete subscriber-function type.
  pub fn boxed(self) -> BoxedObservable<Item, Err>
  where
    F: 'static,
  {
    let subscribe = self.subscribe;
    Observable::new(Box::new(move |subscriber| (subscribe)(subscriber)))
  }
}

/// An observable that emits one value, then completes.
pub fn of<Item, Err>(value: Item) -> Observable<impl Fn(Subscriber<Item, Err>) -> TearDown, Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
    subscriber.next(value.clone());
    subscriber.complete();
    TearDown::none()
  })
}

/// An observable that signals one terminal error on subscribe.
pub fn throw<Item, Err>(err: Err) -> Observable<impl Fn(Subscriber<Item, Err>) -> TearDown, Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
    subscriber.error(err.clone());
    TearDown::none()
  })
}
