use chrono::{DateTime, Utc};

use super::Client;
use super::error::Error;
use super::model::{
    DomainCheckResponse, DomainInfoResponse, DomainList, DomainListRequest, DomainRegisterRequest,
    DomainRegisterResponse, DomainRenewResponse, DomainUpdateRequest,
};
use super::value::{Args, Encode, Fields};

const METHOD_DOMAIN_CHECK: &str = "domain.check";
const METHOD_DOMAIN_CREATE: &str = "domain.create";
const METHOD_DOMAIN_DELETE: &str = "domain.delete";
const METHOD_DOMAIN_INFO: &str = "domain.info";
const METHOD_DOMAIN_LIST: &str = "domain.list";
const METHOD_DOMAIN_RENEW: &str = "domain.renew";
const METHOD_DOMAIN_UPDATE: &str = "domain.update";
const METHOD_DOMAIN_WHOIS: &str = "domain.whois";

/// Domain registration and management.
#[derive(Debug, Clone, Copy)]
pub struct DomainService<'c> {
    client: &'c Client,
}

impl<'c> DomainService<'c> {
    pub(crate) fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Checks whether the given domains can be registered.
    pub async fn check(&self, domains: &[String]) -> Result<DomainCheckResponse, Error> {
        let req = self.client.new_request(METHOD_DOMAIN_CHECK, Args::new().field("domain", domains));
        self.client.call_decode(req).await
    }

    /// Registers a domain.
    pub async fn register(&self, request: &DomainRegisterRequest) -> Result<DomainRegisterResponse, Error> {
        let req = self.client.new_request(METHOD_DOMAIN_CREATE, request.encode());
        self.client.call_decode(req).await
    }

    /// Deletes a domain, optionally at a scheduled date rather than immediately.
    pub async fn delete(&self, domain: &str, scheduled: Option<DateTime<Utc>>) -> Result<(), Error> {
        let mut args = Args::new().field("domain", domain);
        if let Some(date) = scheduled {
            args.insert("scDate", date);
        }

        let req = self.client.new_request(METHOD_DOMAIN_DELETE, args);
        self.client.call(req).await?;
        Ok(())
    }

    /// Gets full information (including contacts) about a domain. `ro_id` may be `0` to look up by name only.
    pub async fn info(&self, domain: &str, ro_id: i64) -> Result<DomainInfoResponse, Error> {
        let args = Args::new().field("domain", domain).field_opt("roId", ro_id).field("wide", 2);
        let req = self.client.new_request(METHOD_DOMAIN_INFO, args);
        self.client.call_decode(req).await
    }

    /// Lists the account's domains.
    pub async fn list(&self, request: Option<&DomainListRequest>) -> Result<DomainList, Error> {
        let request = request.ok_or(Error::MissingRequest(METHOD_DOMAIN_LIST))?;

        let req = self.client.new_request(METHOD_DOMAIN_LIST, request.encode());
        self.client.call_decode(req).await
    }

    /// Renews a domain for `period` (like `1Y`).
    pub async fn renew(&self, domain: &str, period: &str) -> Result<DomainRenewResponse, Error> {
        let args = Args::new().field("domain", domain).field("period", period);
        let req = self.client.new_request(METHOD_DOMAIN_RENEW, args);
        self.client.call_decode(req).await
    }

    /// Updates a domain's settings. Returns the price charged for the update, if any.
    pub async fn update(&self, request: &DomainUpdateRequest) -> Result<f64, Error> {
        let req = self.client.new_request(METHOD_DOMAIN_UPDATE, request.encode());
        let data = self.client.call(req).await?;
        Ok(Fields::new(&data).get("price")?)
    }

    /// Gets the raw WHOIS text for a domain.
    pub async fn whois(&self, domain: &str) -> Result<String, Error> {
        let req = self.client.new_request(METHOD_DOMAIN_WHOIS, Args::new().field("domain", domain));
        let data = self.client.call(req).await?;
        Ok(Fields::new(&data).get("whois")?)
    }
}
