use crate::api::error::DecodeError;
use crate::api::value::{Fields, FromValue, Value};

/// Response returned by `account.login`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginResponse {
    pub customer_id: i64,
    pub account_id: i64,
    /// Two-factor method on the account, or `"0"` when none is set up.
    pub tfa: String,
    pub build_date: String,
    pub version: String,
}

impl LoginResponse {
    /// Whether the session stays locked until [`unlock`][crate::api::AccountService::unlock] is called with a TAN.
    pub fn needs_unlock(&self) -> bool {
        !self.tfa.is_empty() && self.tfa != "0"
    }
}

impl FromValue for LoginResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            customer_id: f.get("customerId")?,
            account_id: f.get("accountId")?,
            tfa: f.get("tfa")?,
            build_date: f.get("builddate")?,
            version: f.get("version")?,
        })
    }
}

/// Response returned by `account.info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountInfoResponse {
    pub customer_no: i64,
    pub customer_id: i64,
    pub username: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub language: String,
}

impl FromValue for AccountInfoResponse {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let f = Fields::of(value)?;
        Ok(Self {
            customer_no: f.get("customerNo")?,
            customer_id: f.get("customerId")?,
            username: f.get("username")?,
            title: f.get("title")?,
            first_name: f.get("firstname")?,
            last_name: f.get("lastname")?,
            organization: f.get("org")?,
            street: f.get("street")?,
            city: f.get("city")?,
            postal_code: f.get("pc")?,
            country_code: f.get("cc")?,
            phone: f.get("voice")?,
            fax: f.get("fax")?,
            email: f.get("email")?,
            language: f.get("language")?,
        })
    }
}
