use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::Contact;
use crate::api::error::DecodeError;
use crate::api::value::{Args, Encode, Fields, FromValue, Value};

/// Availability of a single domain, as returned by `domain.check`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainCheck {
    /// `1` if the domain can be registered.
    pub available: i64,
    pub status: String,
    pub name: String,
    pub domain: String,
    pub tld: String,
    pub check_method: String,
    pub price: f64,
    pub check_time: f64,
}

impl DomainCheck {
    pub fn is_available(&self) -> bool {
        self.available == 1
    }
}

impl FromValue for DomainCheck {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            available: f.get("avail")?,
            status: f.get("status")?,
            name: f.get("name")?,
            domain: f.get("domain")?,
            tld: f.get("tld")?,
            check_method: f.get("checkmethod")?,
            price: f.get("price")?,
            check_time: f.get("checktime")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainCheckResponse {
    pub domains: Vec<DomainCheck>,
}

impl FromValue for DomainCheckResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            domains: f.get("domain")?,
        })
    }
}

/// Request for `domain.create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainRegisterRequest {
    pub domain: String,
    /// Registration period, like `1Y`.
    pub period: String,
    pub registrant: i64,
    pub admin: i64,
    pub tech: i64,
    pub billing: i64,
    pub nameservers: Vec<String>,
    pub transfer_lock: String,
    pub renewal_mode: String,
    pub whois_provider: String,
    pub whois_url: String,
    pub sc_date: String,
    pub ext_date: String,
    pub asynchron: String,
    pub voucher: String,
    pub testing: bool,
}

impl Encode for DomainRegisterRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field("domain", &self.domain)
            .field_opt("period", &self.period)
            .field("registrant", self.registrant)
            .field("admin", self.admin)
            .field("tech", self.tech)
            .field("billing", self.billing)
            .field_opt("ns", &self.nameservers)
            .field_opt("transferLock", &self.transfer_lock)
            .field_opt("renewalMode", &self.renewal_mode)
            .field_opt("whoisProvider", &self.whois_provider)
            .field_opt("whoisUrl", &self.whois_url)
            .field_opt("scDate", &self.sc_date)
            .field_opt("extDate", &self.ext_date)
            .field_opt("asynchron", &self.asynchron)
            .field_opt("voucher", &self.voucher)
            .field_opt("testing", self.testing)
    }
}

/// Response returned by `domain.create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainRegisterResponse {
    pub ro_id: i64,
    pub price: f64,
    pub currency: String,
}

impl FromValue for DomainRegisterResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            ro_id: f.get("roId")?,
            price: f.get("price")?,
            currency: f.get("currency")?,
        })
    }
}

/// Response returned by `domain.info`; also the element type of `domain.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainInfoResponse {
    pub ro_id: i64,
    pub domain: String,
    pub domain_ace: String,
    pub period: String,
    pub created: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub re_date: Option<DateTime<Utc>>,
    pub sc_date: Option<DateTime<Utc>>,
    pub transfer_lock: i64,
    pub status: String,
    pub auth_code: String,
    pub renewal_mode: String,
    pub transfer_mode: String,
    pub registrant: i64,
    pub admin: i64,
    pub tech: i64,
    pub billing: i64,
    pub nameservers: Vec<String>,
    pub no_delegation: String,
    /// Full contact details by role (`registrant`, `admin`, ...), when requested.
    pub contacts: BTreeMap<String, Contact>,
}

impl FromValue for DomainInfoResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            ro_id: f.get("roId")?,
            domain: f.get("domain")?,
            domain_ace: f.get("domainAce")?,
            period: f.get("period")?,
            created: f.get_opt("crDate")?,
            expires: f.get_opt("exDate")?,
            updated: f.get_opt("upDate")?,
            re_date: f.get_opt("reDate")?,
            sc_date: f.get_opt("scDate")?,
            transfer_lock: f.get("transferLock")?,
            status: f.get("status")?,
            auth_code: f.get("authCode")?,
            renewal_mode: f.get("renewalMode")?,
            transfer_mode: f.get("transferMode")?,
            registrant: f.get("registrant")?,
            admin: f.get("admin")?,
            tech: f.get("tech")?,
            billing: f.get("billing")?,
            nameservers: f.get("ns")?,
            no_delegation: f.get("noDelegation")?,
            contacts: f.get("contact")?,
        })
    }
}

/// Request for `domain.list`. Every field is a filter and may be left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainListRequest {
    pub domain: String,
    pub ro_id: i64,
    pub status: String,
    pub registrant: i64,
    pub admin: i64,
    pub tech: i64,
    pub billing: i64,
    pub renewal_mode: String,
    pub transfer_lock: i64,
    pub no_delegation: String,
    pub tag: i64,
    pub order: String,
    pub page: i64,
    pub page_limit: i64,
    pub wide: i64,
}

impl Encode for DomainListRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domain", &self.domain)
            .field_opt("roId", self.ro_id)
            .field_opt("status", &self.status)
            .field_opt("registrant", self.registrant)
            .field_opt("admin", self.admin)
            .field_opt("tech", self.tech)
            .field_opt("billing", self.billing)
            .field_opt("renewalMode", &self.renewal_mode)
            .field_opt("transferLock", self.transfer_lock)
            .field_opt("noDelegation", &self.no_delegation)
            .field_opt("tag", self.tag)
            .field_opt("order", &self.order)
            .field_opt("page", self.page)
            .field_opt("pagelimit", self.page_limit)
            .field_opt("wide", self.wide)
    }
}

/// Response returned by `domain.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainList {
    pub count: i64,
    pub domains: Vec<DomainInfoResponse>,
}

impl FromValue for DomainList {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            count: f.get("count")?,
            domains: f.get("domain")?,
        })
    }
}

/// Response returned by `domain.renew`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainRenewResponse {
    pub price: f64,
    pub currency: String,
}

impl FromValue for DomainRenewResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            price: f.get("price")?,
            currency: f.get("currency")?,
        })
    }
}

/// Request for `domain.update`. Only non-empty fields are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainUpdateRequest {
    pub domain: String,
    pub nameservers: Vec<String>,
    pub transfer_lock: i64,
    pub renewal_mode: String,
    pub transfer_mode: String,
    pub registrant: i64,
    pub admin: i64,
    pub tech: i64,
    pub billing: i64,
    pub auth_code: String,
    pub sc_date: String,
    pub voucher: String,
    pub testing: bool,
}

impl Encode for DomainUpdateRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field("domain", &self.domain)
            .field_opt("ns", &self.nameservers)
            .field_opt("transferLock", self.transfer_lock)
            .field_opt("renewalMode", &self.renewal_mode)
            .field_opt("transferMode", &self.transfer_mode)
            .field_opt("registrant", self.registrant)
            .field_opt("admin", self.admin)
            .field_opt("tech", self.tech)
            .field_opt("billing", self.billing)
            .field_opt("authCode", &self.auth_code)
            .field_opt("scDate", &self.sc_date)
            .field_opt("voucher", &self.voucher)
            .field_opt("testing", self.testing)
    }
}
