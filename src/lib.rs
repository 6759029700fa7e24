//! A client for the INWX domain registrar's XML-RPC API ("domrobot").
//!
//! Every call goes through the same pipeline: a typed request is [encoded][api::value::Encode] into an argument map,
//! sent by a [`Transport`][api::Transport], and the response's status code is checked before its payload is decoded
//! into a typed result. Codes `1000..=1500` are successes; anything else comes back as an [`api::ErrorResponse`].
//!
//! ```no_run
//! # async fn run() -> Result<(), inwx::Error> {
//! let client = inwx::Client::new("username", "password", Some(inwx::ClientOptions { sandbox: true }))?;
//! client.account().login().await?;
//!
//! let zones = client.nameservers().list("").await?;
//! for zone in &zones.domains {
//!     println!("{} ({})", zone.domain, zone.ro_id);
//! }
//!
//! client.account().logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;

pub use self::api::{Client, ClientOptions, Error};
