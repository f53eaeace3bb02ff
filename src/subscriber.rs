//! Guarded per-subscription observer.
//!
//! [`Subscriber`] wraps the raw observer handed to `subscribe` and enforces
//! the terminal latch: once `error` or `complete` has been forwarded, every
//! further notification is a silent no-op. The latch is the `Option` inside a
//! shared cell; forwarding a terminal takes the observer out and then tears
//! down the owning subscription, so exactly one teardown path runs.
//!
//! Consumer-side unsubscribe closes the subscription but does not latch the
//! cell. Producers consult [`Observer::is_closed`] before delivering (the
//! async bridge does so after every settlement), which keeps a late
//! settlement after unsubscribe undelivered while still allowing multicast
//! snapshot dispatch to finish the round it already started.

use crate::{
  observer::Observer,
  rc::MutRc,
  subscription::{Subscription, SubscriptionLike},
};

type ObserverCell<Item, Err> = MutRc<Option<Box<dyn Observer<Item, Err>>>>;

/// The observer handed to producer functions; cloneable so the multicast
/// operator can keep one handle in its list while the producer keeps another.
pub struct Subscriber<Item, Err> {
  observer: ObserverCell<Item, Err>,
  subscription: Subscription,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { observer: self.observer.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  pub(crate) fn new(observer: impl Observer<Item, Err> + 'static, subscription: Subscription) -> Self
  where
    Item: 'static,
    Err: 'static,
  {
    Self { observer: MutRc::own(Some(Box::new(observer))), subscription }
  }

  /// Identity of the underlying observer cell; used by the multicast
  /// operator to remove a subscriber from its list.
  pub(crate) fn ptr_eq(&self, other: &Self) -> bool { self.observer.ptr_eq(&other.observer) }
}

impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  fn next(&mut self, value: Item) {
    // Take the observer out for the duration of the callback so a handler
    // that unsubscribes or signals through a clone cannot re-borrow the
    // cell. Not restored if the handler closed its own subscription.
    let taken = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = taken {
      observer.next(value);
      let mut cell = self.observer.rc_deref_mut();
      if cell.is_none() && !self.subscription.is_closed() {
        *cell = Some(observer);
      }
    }
  }

  fn error(&mut self, err: Err) {
    if self.subscription.is_closed() {
      return;
    }
    let taken = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = taken {
      observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    if self.subscription.is_closed() {
      return;
    }
    let taken = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = taken {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool {
    self.observer.rc_deref().is_none() || self.subscription.is_closed()
  }
}
