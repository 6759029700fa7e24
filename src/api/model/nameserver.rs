use chrono::{DateTime, Utc};

use crate::api::error::DecodeError;
use crate::api::value::{Args, Encode, Fields, FromValue, Value};

/// Response returned by `nameserver.check`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverCheckResponse {
    pub details: Vec<String>,
    pub status: String,
}

impl FromValue for NameserverCheckResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            details: f.get("details")?,
            status: f.get("status")?,
        })
    }
}

/// Request for `nameserver.createRecord` and `nameserver.updateRecord`.
///
/// Either `ro_id` or `domain` identifies the zone when creating a record; both are ignored by updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverRecordRequest {
    pub ro_id: i64,
    pub domain: String,
    pub record_type: String,
    pub content: String,
    pub name: String,
    pub ttl: u32,
    pub priority: u32,
    pub url_append: bool,
    pub url_redirect_type: String,
    pub url_redirect_title: String,
    pub url_redirect_description: String,
    pub url_redirect_fav_icon: String,
    pub url_redirect_keywords: String,
}

impl Encode for NameserverRecordRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("roId", self.ro_id)
            .field_opt("domain", &self.domain)
            .field("type", &self.record_type)
            .field("content", &self.content)
            .field_opt("name", &self.name)
            .field_opt("ttl", self.ttl)
            .field_opt("prio", self.priority)
            .field_opt("urlAppend", self.url_append)
            .field_opt("urlRedirectType", &self.url_redirect_type)
            .field_opt("urlRedirectTitle", &self.url_redirect_title)
            .field_opt("urlRedirectDescription", &self.url_redirect_description)
            .field_opt("urlRedirectFavIcon", &self.url_redirect_fav_icon)
            .field_opt("urlRedirectKeywords", &self.url_redirect_keywords)
    }
}

/// Request for `nameserver.create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverCreateRequest {
    pub domain: String,
    /// `MASTER` or `SLAVE`.
    pub zone_type: String,
    pub nameservers: Vec<String>,
    pub master_ip: String,
    pub web: String,
    pub mail: String,
    pub soa_email: String,
    pub url_redirect_type: String,
    pub url_redirect_title: String,
    pub url_redirect_description: String,
    pub url_redirect_fav_icon: String,
    pub url_redirect_keywords: String,
    pub testing: bool,
}

impl Encode for NameserverCreateRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field("domain", &self.domain)
            .field("type", &self.zone_type)
            .field_opt("ns", &self.nameservers)
            .field_opt("masterIp", &self.master_ip)
            .field_opt("web", &self.web)
            .field_opt("mail", &self.mail)
            .field_opt("soaEmail", &self.soa_email)
            .field_opt("urlRedirectType", &self.url_redirect_type)
            .field_opt("urlRedirectTitle", &self.url_redirect_title)
            .field_opt("urlRedirectDescription", &self.url_redirect_description)
            .field_opt("urlRedirectFavIcon", &self.url_redirect_fav_icon)
            .field_opt("urlRedirectKeywords", &self.url_redirect_keywords)
            .field_opt("testing", self.testing)
    }
}

/// Request for `nameserver.update`. Only non-empty fields are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverUpdateRequest {
    pub domain: String,
    pub ro_id: i64,
    pub zone_type: String,
    pub master_ip: String,
    pub nameservers: Vec<String>,
    pub testing: bool,
}

impl Encode for NameserverUpdateRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domain", &self.domain)
            .field_opt("roId", self.ro_id)
            .field_opt("type", &self.zone_type)
            .field_opt("masterIp", &self.master_ip)
            .field_opt("ns", &self.nameservers)
            .field_opt("testing", self.testing)
    }
}

/// Request for `nameserver.info`: a zone (by `domain` or `ro_id`) plus optional record filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverInfoRequest {
    pub domain: String,
    pub ro_id: i64,
    pub record_id: i64,
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub priority: u32,
}

impl Encode for NameserverInfoRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domain", &self.domain)
            .field_opt("roId", self.ro_id)
            .field_opt("recordId", self.record_id)
            .field_opt("type", &self.record_type)
            .field_opt("name", &self.name)
            .field_opt("content", &self.content)
            .field_opt("ttl", self.ttl)
            .field_opt("prio", self.priority)
    }
}

/// Response returned by `nameserver.info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverInfoResponse {
    pub ro_id: i64,
    pub domain: String,
    pub zone_type: String,
    pub master_ip: String,
    pub last_zone_check: Option<DateTime<Utc>>,
    pub slave_dns: Vec<SlaveInfo>,
    pub soa_serial: String,
    pub count: i64,
    pub records: Vec<NameserverRecord>,
}

impl FromValue for NameserverInfoResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            ro_id: f.get("roId")?,
            domain: f.get("domain")?,
            zone_type: f.get("type")?,
            master_ip: f.get("masterIp")?,
            last_zone_check: f.get_opt("lastZoneCheck")?,
            slave_dns: f.get("slaveDns")?,
            soa_serial: f.get("SOAserial")?,
            count: f.get("count")?,
            records: f.get("record")?,
        })
    }
}

/// A secondary nameserver of a `SLAVE` zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlaveInfo {
    pub name: String,
    pub ip: String,
}

impl FromValue for SlaveInfo {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            name: f.get("name")?,
            ip: f.get("ip")?,
        })
    }
}

/// A single DNS record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverRecord {
    pub id: i64,
    pub name: String,
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    pub priority: u32,
    pub url_append: bool,
    pub url_redirect_type: String,
    pub url_redirect_title: String,
    pub url_redirect_description: String,
    pub url_redirect_keywords: String,
    pub url_redirect_fav_icon: String,
}

impl FromValue for NameserverRecord {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            id: f.get("id")?,
            name: f.get("name")?,
            record_type: f.get("type")?,
            content: f.get("content")?,
            // Records report their TTL upper-case, unlike the requests that set it.
            ttl: f.get("TTL")?,
            priority: f.get("prio")?,
            url_append: f.get("urlAppend")?,
            url_redirect_type: f.get("urlRedirectType")?,
            url_redirect_title: f.get("urlRedirectTitle")?,
            url_redirect_description: f.get("urlRedirectDescription")?,
            url_redirect_keywords: f.get("urlRedirectKeywords")?,
            url_redirect_fav_icon: f.get("urlRedirectFavIcon")?,
        })
    }
}

/// Request for `nameserver.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverListRequest {
    pub domain: String,
    pub wide: i64,
    pub page: i64,
    pub page_limit: i64,
}

impl Encode for NameserverListRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domain", &self.domain)
            .field_opt("wide", self.wide)
            .field_opt("page", self.page)
            .field_opt("pagelimit", self.page_limit)
    }
}

/// Response returned by `nameserver.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverListResponse {
    pub count: i64,
    pub domains: Vec<NameserverDomain>,
}

impl FromValue for NameserverListResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            count: f.get("count")?,
            domains: f.get("domains")?,
        })
    }
}

/// A zone, as listed by `nameserver.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameserverDomain {
    pub ro_id: i64,
    pub domain: String,
    pub zone_type: String,
    pub master_ip: String,
    pub mail: String,
    pub web: String,
    pub url: String,
    pub ipv4: String,
    pub ipv6: String,
}

impl FromValue for NameserverDomain {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            ro_id: f.get("roId")?,
            domain: f.get("domain")?,
            zone_type: f.get("type")?,
            master_ip: f.get("masterIp")?,
            mail: f.get("mail")?,
            web: f.get("web")?,
            url: f.get("url")?,
            ipv4: f.get("ipv4")?,
            ipv6: f.get("ipv6")?,
        })
    }
}
