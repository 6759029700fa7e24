use super::Client;
use super::error::Error;
use super::model::{AccountInfoResponse, LoginResponse};
use super::value::Args;

const METHOD_ACCOUNT_INFO: &str = "account.info";
const METHOD_ACCOUNT_LOCK: &str = "account.lock";
const METHOD_ACCOUNT_LOGIN: &str = "account.login";
const METHOD_ACCOUNT_LOGOUT: &str = "account.logout";
const METHOD_ACCOUNT_UNLOCK: &str = "account.unlock";

/// Session and account management.
#[derive(Debug, Clone, Copy)]
pub struct AccountService<'c> {
    client: &'c Client,
}

impl<'c> AccountService<'c> {
    pub(crate) fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Opens a session with the client's credentials.
    ///
    /// If [`LoginResponse::needs_unlock`] is true, the session must be unlocked with a TAN before any other call.
    pub async fn login(&self) -> Result<LoginResponse, Error> {
        let args = Args::new()
            .field("user", self.client.username())
            .field("pass", self.client.password());
        let req = self.client.new_request(METHOD_ACCOUNT_LOGIN, args);
        self.client.call_decode(req).await
    }

    pub async fn logout(&self) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_ACCOUNT_LOGOUT, Args::new());
        self.client.call(req).await?;
        Ok(())
    }

    /// Locks the account: further calls need [`unlock`][Self::unlock].
    pub async fn lock(&self) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_ACCOUNT_LOCK, Args::new());
        self.client.call(req).await?;
        Ok(())
    }

    /// Unlocks a session with a two-factor TAN.
    pub async fn unlock(&self, tan: &str) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_ACCOUNT_UNLOCK, Args::new().field("tan", tan));
        self.client.call(req).await?;
        Ok(())
    }

    pub async fn info(&self) -> Result<AccountInfoResponse, Error> {
        let req = self.client.new_request(METHOD_ACCOUNT_INFO, Args::new());
        self.client.call_decode(req).await
    }
}
