//! Subscription handles and teardown bookkeeping.
//!
//! Subscribing to an observable returns a [`Subscription`]. Unsubscribing is
//! idempotent: the first call runs every registered [`TearDown`], later calls
//! do nothing. Teardowns registered after the subscription closed run
//! immediately.

use smallvec::SmallVec;

use crate::rc::MutRc;

/// Anything that can be unsubscribed from.
pub trait SubscriptionLike {
  /// Detach from the producer. Calling this more than once has no
  /// additional effect.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

/// What a producer hands back from its subscriber function: nothing, a
/// cleanup closure, or a nested subscription to cascade into.
pub enum TearDown {
  None,
  Once(Box<dyn FnOnce()>),
  Sub(Box<dyn SubscriptionLike>),
}

impl TearDown {
  #[inline]
  pub fn none() -> Self { TearDown::None }

  pub fn from_fn(f: impl FnOnce() + 'static) -> Self { TearDown::Once(Box::new(f)) }

  pub fn from_sub(sub: impl SubscriptionLike + 'static) -> Self { TearDown::Sub(Box::new(sub)) }

  fn run(self) {
    match self {
      TearDown::None => {}
      TearDown::Once(f) => f(),
      TearDown::Sub(mut sub) => sub.unsubscribe(),
    }
  }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[TearDown; 1]>,
}

/// Handle returned by subscribing to an observable.
#[derive(Clone, Default)]
pub struct Subscription(MutRc<Inner>);

impl Subscription {
  /// Register a teardown to run on unsubscribe. If the subscription is
  /// already closed, the teardown runs right away.
  pub fn add(&self, teardown: TearDown) {
    let run_now = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        Some(teardown)
      } else {
        inner.teardown.push(teardown);
        None
      }
    };
    if let Some(teardown) = run_now {
      teardown.run();
    }
  }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&mut self) {
    // Drain before running so a teardown can re-enter this subscription
    // without holding the borrow.
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for t in teardown {
      t.run();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  #[test]
  fn unsubscribe_runs_teardown_once() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();

    let mut subscription = Subscription::default();
    subscription.add(TearDown::from_fn(move || c_runs.set(c_runs.get() + 1)));

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(runs.get(), 1);
    assert!(subscription.is_closed());
  }

  #[test]
  fn add_after_close_runs_immediately() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();

    let mut subscription = Subscription::default();
    subscription.unsubscribe();
    subscription.add(TearDown::from_fn(move || c_runs.set(c_runs.get() + 1)));
    assert_eq!(runs.get(), 1);
  }

  #[test]
  fn nested_subscription_cascades() {
    let mut inner = Subscription::default();
    let mut outer = Subscription::default();
    outer.add(TearDown::from_sub(inner.clone()));

    outer.unsubscribe();
    assert!(inner.is_closed());

    // Idempotent on the nested handle too.
    inner.unsubscribe();
    assert!(inner.is_closed());
  }

  #[test]
  fn reentrant_unsubscribe_from_teardown_is_harmless() {
    let subscription = Subscription::default();
    let mut reenter = subscription.clone();
    subscription.add(TearDown::from_fn(move || reenter.unsubscribe()));

    let mut handle = subscription.clone();
    handle.unsubscribe();
    assert!(subscription.is_closed());
  }
}
