//! Operators: plain functions from observable to observable, applied with
//! [`Observable::pipe`](crate::observable::Observable::pipe).

pub mod share;
pub use share::share;
