use std::fmt;

use super::error::{Error, ErrorResponse};
use super::transport::{HttpTransport, RawResponse, Transport};
use super::value::{Args, FromValue, Struct, Value};
use super::{
    API_BASE_URL, API_LANGUAGE, API_SANDBOX_BASE_URL, AccountService, ContactService, DnssecService, DomainService,
    NameserverService,
};

/// Options for [`Client::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    /// Talk to the registrar's test environment (OT&E) instead of production.
    pub sandbox: bool,
}

/// A single remote call, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub args: Struct,
}

/// The access point to the INWX API.
///
/// The client holds no state between calls other than its credentials and its transport (which, for the default
/// [`HttpTransport`], carries the session cookie set by [`AccountService::login`]).
pub struct Client {
    transport: Box<dyn Transport>,
    username: String,
    password: String,
}

impl Client {
    /// Creates a client for the production API, or for the sandbox if `options` asks for it.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        options: Option<ClientOptions>,
    ) -> Result<Self, Error> {
        let sandbox = options.is_some_and(|opts| opts.sandbox);
        let base_url = if sandbox { API_SANDBOX_BASE_URL } else { API_BASE_URL };
        let transport = HttpTransport::new(base_url)?;
        Ok(Self::with_transport(username, password, transport))
    }

    /// Creates a client that sends its calls through `transport`.
    pub fn with_transport(
        username: impl Into<String>,
        password: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn account(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn domains(&self) -> DomainService<'_> {
        DomainService::new(self)
    }

    pub fn contacts(&self) -> ContactService<'_> {
        ContactService::new(self)
    }

    pub fn nameservers(&self) -> NameserverService<'_> {
        NameserverService::new(self)
    }

    pub fn dnssec(&self) -> DnssecService<'_> {
        DnssecService::new(self)
    }

    /// Builds a request for `method`, adding the `lang` argument every call must carry.
    pub fn new_request(&self, method: impl Into<String>, args: Args) -> Request {
        let mut args = args.into_struct();
        args.insert("lang".to_string(), Value::from(API_LANGUAGE));

        Request {
            method: method.into(),
            args,
        }
    }

    /// Sends `request` and returns the response payload (`resData`) if the registrar reports success.
    pub async fn call(&self, request: Request) -> Result<Struct, Error> {
        let Request { method, args } = request;

        log::debug!("Calling {method}");
        let raw = self.transport.call(&method, args).await?;
        log::trace!("{method} returned code {}", raw.code);

        check_response(&raw)?;
        Ok(raw.data)
    }

    /// Sends `request` and decodes its payload into `T`.
    pub async fn call_decode<T: FromValue>(&self, request: Request) -> Result<T, Error> {
        let data = self.call(request).await?;
        Ok(T::from_value(&Value::Struct(data))?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Checks a response's status code. Codes `1000` through `1500` (inclusive) are successes; everything else becomes an
/// [`ErrorResponse`].
pub fn check_response(raw: &RawResponse) -> Result<(), ErrorResponse> {
    if (1000..=1500).contains(&raw.code) {
        return Ok(());
    }

    Err(ErrorResponse {
        code: raw.code,
        message: raw.message.clone(),
        reason: raw.reason.clone(),
        reason_code: raw.reason_code.clone(),
    })
}
