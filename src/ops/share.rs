//! Reference-counted multicast.
//!
//! [`share`] wraps a cold observable so that any number of downstream
//! subscribers are served by a single upstream subscription. The first
//! subscriber connects the upstream; later subscribers join the group; the
//! last one to unsubscribe tears the upstream down, and a fresh
//! first-subscribe after that connects anew.
//!
//! After a terminal notification the group stays finished: a later subscriber
//! attaches to the already-completed upstream and receives nothing. This
//! one-shot behavior is intentional for single-resolution operations such as
//! requests; callers wanting replay or reset must compose it themselves.

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike, TearDown},
};

struct ShareGroup<Item, Err> {
  observers: Vec<Subscriber<Item, Err>>,
  connection: Option<Subscription>,
  terminated: bool,
}

impl<Item, Err> Default for ShareGroup<Item, Err> {
  fn default() -> Self { Self { observers: vec![], connection: None, terminated: false } }
}

/// Forwards upstream notifications to a snapshot of the group.
///
/// The snapshot is copied with no borrow held during the callbacks, so an
/// observer that synchronously unsubscribes another observer mid-dispatch
/// cannot skip or double-deliver within that round.
struct ShareForward<Item, Err> {
  group: MutRc<ShareGroup<Item, Err>>,
}

impl<Item, Err> Observer<Item, Err> for ShareForward<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    let snapshot = self.group.rc_deref().observers.clone();
    for mut target in snapshot {
      target.next(value.clone());
    }
  }

  fn error(&mut self, err: Err) {
    let snapshot = {
      let mut group = self.group.rc_deref_mut();
      group.terminated = true;
      group.connection = None;
      group.observers.clone()
    };
    for mut target in snapshot {
      target.error(err.clone());
    }
  }

  fn complete(&mut self) {
    let snapshot = {
      let mut group = self.group.rc_deref_mut();
      group.terminated = true;
      group.connection = None;
      group.observers.clone()
    };
    for mut target in snapshot {
      target.complete();
    }
  }
}

/// Multicast a cold observable through one reference-counted upstream
/// subscription. Apply with `observable.pipe(share)`.
pub fn share<F, Item, Err>(
  source: Observable<F, Item, Err>,
) -> Observable<impl Fn(Subscriber<Item, Err>) -> TearDown, Item, Err>
where
  F: Fn(Subscriber<Item, Err>) -> TearDown + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  let group: MutRc<ShareGroup<Item, Err>> = MutRc::own(ShareGroup::default());
  Observable::new(move |downstream: Subscriber<Item, Err>| {
    group.rc_deref_mut().observers.push(downstream.clone());

    let needs_connection = {
      let group = group.rc_deref();
      group.connection.is_none() && !group.terminated
    };
    if needs_connection {
      let connection = source.subscribe_with(ShareForward { group: group.clone() });
      let mut group = group.rc_deref_mut();
      // A source that terminated synchronously during subscribe already
      // finished the group; only memoize a live connection.
      if !group.terminated {
        group.connection = Some(connection);
      }
    }

    let group = group.clone();
    TearDown::from_fn(move || {
      let connection = {
        let mut group = group.rc_deref_mut();
        group.observers.retain(|observer| !observer.ptr_eq(&downstream));
        if group.observers.is_empty() { group.connection.take() } else { None }
      };
      if let Some(mut connection) = connection {
        connection.unsubscribe();
      }
    })
  })
}
