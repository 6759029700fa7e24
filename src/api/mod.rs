mod account;
mod client;
mod contact;
mod dnssec;
mod domain;
mod error;
pub mod model;
mod nameserver;
mod transport;
pub mod value;
pub mod xmlrpc;

#[cfg(test)]
mod testing;

pub use self::account::AccountService;
pub use self::client::{Client, ClientOptions, Request, check_response};
pub use self::contact::ContactService;
pub use self::dnssec::DnssecService;
pub use self::domain::DomainService;
pub use self::error::{DecodeError, Error, ErrorResponse, TransportError};
pub use self::nameserver::NameserverService;
pub use self::transport::{HttpTransport, RawResponse, Transport};

/// Production endpoint.
pub const API_BASE_URL: &str = "https://api.domrobot.com/xmlrpc/";

/// Test environment (OT&E) endpoint. Changes made here have no real-world effect.
pub const API_SANDBOX_BASE_URL: &str = "https://api.ote.domrobot.com/xmlrpc/";

/// Language of the registrar's messages; sent with every request.
pub const API_LANGUAGE: &str = "eng";
