//! The consumer side of the stream contract.
//!
//! An [`Observer`] receives values through `next`, and at most one terminal
//! notification through `error` or `complete`. Enforcement of the
//! at-most-one-terminal rule lives in [`crate::subscriber::Subscriber`]; raw
//! observers only have to implement the three callbacks.

/// Consumer of a push-based stream.
///
/// Object safe: observers are boxed into observer lists by the multicast
/// operator.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the terminal error notification.
  fn error(&mut self, err: Err);

  /// Receive the terminal completion notification.
  fn complete(&mut self);

  /// `true` once the observer will accept no further notifications.
  fn is_closed(&self) -> bool { false }
}

/// Closure adapter handling `next` only; errors and completion are ignored.
///
/// Prefer [`ObserverAll`] (via `subscribe_all`) whenever the stream can fail.
pub struct ObserverNext<N>(pub N);

impl<Item, Err, N> Observer<Item, Err> for ObserverNext<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value); }

  fn error(&mut self, _err: Err) {}

  fn complete(&mut self) {}
}

/// Closure adapter handling `next` and `error`.
pub struct ObserverErr<N, E> {
  pub next: N,
  pub error: E,
}

impl<Item, Err, N, E> Observer<Item, Err> for ObserverErr<N, E>
where
  N: FnMut(Item),
  E: FnMut(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err); }

  fn complete(&mut self) {}
}

/// Closure adapter handling all three notifications.
pub struct ObserverAll<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(&mut self) { (self.complete)(); }
}
