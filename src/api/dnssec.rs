use super::Client;
use super::error::Error;
use super::model::{DnssecAddRequest, DnssecAddResponse, DnssecInfoResponse, DnssecKeyList, DnssecListRequest};
use super::value::{Args, Encode};

const METHOD_DNSSEC_ADD_DNSKEY: &str = "dnssec.adddnskey";
const METHOD_DNSSEC_DELETE_ALL: &str = "dnssec.deleteall";
const METHOD_DNSSEC_DELETE_DNSKEY: &str = "dnssec.deletednskey";
const METHOD_DNSSEC_DISABLE: &str = "dnssec.disablednssec";
const METHOD_DNSSEC_ENABLE: &str = "dnssec.enablednssec";
const METHOD_DNSSEC_INFO: &str = "dnssec.info";
const METHOD_DNSSEC_LIST_KEYS: &str = "dnssec.listkeys";

/// DNSSEC key management.
#[derive(Debug, Clone, Copy)]
pub struct DnssecService<'c> {
    client: &'c Client,
}

impl<'c> DnssecService<'c> {
    pub(crate) fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Adds one DNSKEY (or DS record) to a domain.
    pub async fn add(&self, request: Option<&DnssecAddRequest>) -> Result<DnssecAddResponse, Error> {
        let request = request.ok_or(Error::MissingRequest(METHOD_DNSSEC_ADD_DNSKEY))?;

        let req = self.client.new_request(METHOD_DNSSEC_ADD_DNSKEY, request.encode());
        self.client.call_decode(req).await
    }

    /// Deletes every DNSKEY/DS entry of a domain.
    pub async fn delete_all(&self, domain: &str) -> Result<(), Error> {
        self.domain_call(METHOD_DNSSEC_DELETE_ALL, domain).await
    }

    /// Deletes one DNSKEY, identified by the key itself.
    pub async fn delete_dnskey(&self, key: &str) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_DNSSEC_DELETE_DNSKEY, Args::new().field("key", key));
        self.client.call(req).await?;
        Ok(())
    }

    /// Turns off automated DNSSEC management for a domain.
    pub async fn disable(&self, domain: &str) -> Result<(), Error> {
        self.domain_call(METHOD_DNSSEC_DISABLE, domain).await
    }

    /// Turns on automated DNSSEC management for a domain.
    pub async fn enable(&self, domain: &str) -> Result<(), Error> {
        self.domain_call(METHOD_DNSSEC_ENABLE, domain).await
    }

    /// Gets the DNSSEC status of the given domains.
    pub async fn info(&self, domains: &[String]) -> Result<DnssecInfoResponse, Error> {
        let req = self.client.new_request(METHOD_DNSSEC_INFO, Args::new().field("domains", domains));
        self.client.call_decode(req).await
    }

    /// Lists DNSKEYs matching the request's filters.
    pub async fn list(&self, request: Option<&DnssecListRequest>) -> Result<DnssecKeyList, Error> {
        let request = request.ok_or(Error::MissingRequest(METHOD_DNSSEC_LIST_KEYS))?;

        let req = self.client.new_request(METHOD_DNSSEC_LIST_KEYS, request.encode());
        self.client.call_decode(req).await
    }

    async fn domain_call(&self, method: &'static str, domain: &str) -> Result<(), Error> {
        let req = self.client.new_request(method, Args::new().field("domainName", domain));
        self.client.call(req).await?;
        Ok(())
    }
}
