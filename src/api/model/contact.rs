use crate::api::error::DecodeError;
use crate::api::value::{Args, Encode, Fields, FromValue, Value};

/// A registrant/admin/tech/billing contact handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub ro_id: i64,
    pub id: i64,
    /// `PERSON`, `ORG`, or `ROLE`.
    pub contact_type: String,
    pub name: String,
    pub organization: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub state_province: String,
    pub country_code: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub remarks: String,
    pub protection: i64,
}

impl FromValue for Contact {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            ro_id: f.get("roId")?,
            id: f.get("id")?,
            contact_type: f.get("type")?,
            name: f.get("name")?,
            organization: f.get("org")?,
            street: f.get("street")?,
            city: f.get("city")?,
            postal_code: f.get("pc")?,
            state_province: f.get("sp")?,
            country_code: f.get("cc")?,
            phone: f.get("voice")?,
            fax: f.get("fax")?,
            email: f.get("email")?,
            remarks: f.get("remarks")?,
            protection: f.get("protection")?,
        })
    }
}

/// Request for `contact.create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactCreateRequest {
    pub contact_type: String,
    pub name: String,
    pub organization: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub state_province: String,
    pub country_code: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub remarks: String,
    pub protection: bool,
    pub testing: bool,
}

impl Encode for ContactCreateRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field("type", &self.contact_type)
            .field("name", &self.name)
            .field_opt("org", &self.organization)
            .field("street", &self.street)
            .field("city", &self.city)
            .field("pc", &self.postal_code)
            .field_opt("sp", &self.state_province)
            .field("cc", &self.country_code)
            .field("voice", &self.phone)
            .field_opt("fax", &self.fax)
            .field("email", &self.email)
            .field_opt("remarks", &self.remarks)
            .field_opt("protection", self.protection)
            .field_opt("testing", self.testing)
    }
}

/// Request for `contact.update`. Only non-empty fields are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactUpdateRequest {
    pub id: i64,
    pub contact_type: String,
    pub name: String,
    pub organization: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub state_province: String,
    pub country_code: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub remarks: String,
    pub protection: bool,
    pub testing: bool,
}

impl Encode for ContactUpdateRequest {
    fn encode(&self) -> Args {
        Args::new()
            .field("id", self.id)
            .field_opt("type", &self.contact_type)
            .field_opt("name", &self.name)
            .field_opt("org", &self.organization)
            .field_opt("street", &self.street)
            .field_opt("city", &self.city)
            .field_opt("pc", &self.postal_code)
            .field_opt("sp", &self.state_province)
            .field_opt("cc", &self.country_code)
            .field_opt("voice", &self.phone)
            .field_opt("fax", &self.fax)
            .field_opt("email", &self.email)
            .field_opt("remarks", &self.remarks)
            .field_opt("protection", self.protection)
            .field_opt("testing", self.testing)
    }
}

/// Response returned by `contact.info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfoResponse {
    pub contact: Contact,
}

impl FromValue for ContactInfoResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            contact: f.get("contact")?,
        })
    }
}

/// Response returned by `contact.list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactListResponse {
    pub count: i64,
    pub contacts: Vec<Contact>,
}

impl FromValue for ContactListResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            count: f.get("count")?,
            contacts: f.get("contact")?,
        })
    }
}
