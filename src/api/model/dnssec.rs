use chrono::{DateTime, Utc};

use crate::api::error::DecodeError;
use crate::api::value::{Args, Encode, Fields, FromValue, Value};

/// Request for `dnssec.adddnskey`. Give either a DNSKEY or a DS record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecAddRequest {
    pub domain_name: String,
    pub dnskey: String,
    pub ds: String,
    pub calculate_digest: bool,
    pub digest_type: i64,
}

impl Encode for DnssecAddRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domainName", &self.domain_name)
            .field_opt("dnskey", &self.dnskey)
            .field_opt("ds", &self.ds)
            .field_opt("calculateDigest", self.calculate_digest)
            .field_opt("digestType", self.digest_type)
    }
}

/// Response returned by `dnssec.adddnskey`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecAddResponse {
    pub dnskey: String,
    pub ds: String,
}

impl FromValue for DnssecAddResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            dnskey: f.get("dnskey")?,
            ds: f.get("ds")?,
        })
    }
}

/// Response returned by `dnssec.info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecInfoResponse {
    pub data: Vec<DnssecInfo>,
}

impl FromValue for DnssecInfoResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self { data: f.get("data")? })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecInfo {
    pub domain: String,
    pub key_count: i64,
    pub dnssec_status: String,
}

impl FromValue for DnssecInfo {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            domain: f.get("domain")?,
            key_count: f.get("keyCount")?,
            dnssec_status: f.get("dnsSecStatus")?,
        })
    }
}

/// Request for `dnssec.listkeys`. Every field is a filter and may be left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecListRequest {
    pub domain_name: String,
    pub domain_name_idn: String,
    pub key_tag: i64,
    pub flag_id: i64,
    pub algorithm_id: i64,
    pub public_key: String,
    pub digest_type_id: i64,
    pub digest: String,
    pub created_before: String,
    pub created_after: String,
    pub status: String,
    pub active: i64,
    pub page: i64,
    pub page_limit: i64,
}

impl Encode for DnssecListRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field_opt("domainName", &self.domain_name)
            .field_opt("domainNameIdn", &self.domain_name_idn)
            .field_opt("keyTag", self.key_tag)
            .field_opt("flagId", self.flag_id)
            .field_opt("algorithmId", self.algorithm_id)
            .field_opt("publicKey", &self.public_key)
            .field_opt("digestTypeId", self.digest_type_id)
            .field_opt("digest", &self.digest)
            .field_opt("createdBefore", &self.created_before)
            .field_opt("createdAfter", &self.created_after)
            .field_opt("status", &self.status)
            .field_opt("active", self.active)
            .field_opt("page", self.page)
            .field_opt("pagelimit", self.page_limit)
    }
}

/// Response returned by `dnssec.listkeys`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecKeyList {
    pub keys: Vec<DnssecKey>,
}

impl FromValue for DnssecKeyList {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            keys: f.get("dnskey")?,
        })
    }
}

/// A DNSKEY (and its DS digest) published for a domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnssecKey {
    pub owner_name: String,
    pub id: i64,
    pub domain_id: i64,
    pub key_tag: i64,
    pub flag_id: i64,
    pub algorithm_id: i64,
    pub public_key: String,
    pub digest_type_id: i64,
    pub digest: String,
    pub created: Option<DateTime<Utc>>,
    pub status: String,
    pub active: i64,
}

impl FromValue for DnssecKey {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            owner_name: f.get("ownerName")?,
            id: f.get("id")?,
            domain_id: f.get("domainId")?,
            key_tag: f.get("keyTag")?,
            flag_id: f.get("flagId")?,
            algorithm_id: f.get("algorithmId")?,
            public_key: f.get("publicKey")?,
            digest_type_id: f.get("digestTypeId")?,
            digest: f.get("digest")?,
            created: f.get_opt("created")?,
            status: f.get("status")?,
            active: f.get("active")?,
        })
    }
}
