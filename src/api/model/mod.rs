//! Request and response models for each API namespace.
//!
//! Requests implement [`Encode`][crate::api::value::Encode]; responses implement
//! [`FromValue`][crate::api::value::FromValue]. Wire names are spelled out in those impls.

mod account;
mod contact;
mod dnssec;
mod domain;
mod nameserver;

pub use self::account::*;
pub use self::contact::*;
pub use self::dnssec::*;
pub use self::domain::*;
pub use self::nameserver::*;
