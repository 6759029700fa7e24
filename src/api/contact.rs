use super::Client;
use super::error::Error;
use super::model::{ContactCreateRequest, ContactInfoResponse, ContactListResponse, ContactUpdateRequest};
use super::value::{Args, Encode, Fields};

const METHOD_CONTACT_CREATE: &str = "contact.create";
const METHOD_CONTACT_DELETE: &str = "contact.delete";
const METHOD_CONTACT_INFO: &str = "contact.info";
const METHOD_CONTACT_LIST: &str = "contact.list";
const METHOD_CONTACT_UPDATE: &str = "contact.update";

/// Contact handle management.
#[derive(Debug, Clone, Copy)]
pub struct ContactService<'c> {
    client: &'c Client,
}

impl<'c> ContactService<'c> {
    pub(crate) fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Creates a contact handle and returns its id.
    pub async fn create(&self, request: &ContactCreateRequest) -> Result<i64, Error> {
        let req = self.client.new_request(METHOD_CONTACT_CREATE, request.encode());
        let data = self.client.call(req).await?;
        Ok(Fields::new(&data).get("id")?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_CONTACT_DELETE, Args::new().field("id", id));
        self.client.call(req).await?;
        Ok(())
    }

    pub async fn update(&self, request: &ContactUpdateRequest) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_CONTACT_UPDATE, request.encode());
        self.client.call(req).await?;
        Ok(())
    }

    pub async fn info(&self, id: i64) -> Result<ContactInfoResponse, Error> {
        let args = Args::new().field("id", id).field("wide", 1);
        let req = self.client.new_request(METHOD_CONTACT_INFO, args);
        self.client.call_decode(req).await
    }

    /// Lists contact handles, optionally filtered by a search term.
    pub async fn list(&self, search: &str) -> Result<ContactListResponse, Error> {
        let req = self.client.new_request(METHOD_CONTACT_LIST, Args::new().field_opt("search", search));
        self.client.call_decode(req).await
    }
}
