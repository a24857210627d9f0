//! Observable state primitives
//!
//! - [`Store`] -- single-value container that notifies listeners
//!   synchronously on every change.
//! - [`Derived`] -- stateless read-only projection of a store.
//! - [`RequestTracker`] -- generation counter that lets only the most
//!   recently issued call of an action kind commit its outcome.
//! - [`CancelScope`] -- cancels every request a store has in flight.

pub mod cancel;
pub mod derived;
pub mod observable;
pub mod tracker;

pub use cancel::CancelScope;
pub use derived::Derived;
pub use observable::{Store, Subscription};
pub use tracker::{RequestTicket, RequestTracker};
