use super::Client;
use super::error::Error;
use super::model::{
    NameserverCheckResponse, NameserverCreateRequest, NameserverDomain, NameserverInfoRequest, NameserverInfoResponse,
    NameserverListRequest, NameserverListResponse, NameserverRecord, NameserverRecordRequest, NameserverUpdateRequest,
};
use super::value::{Args, Encode, Fields};

const METHOD_NAMESERVER_CHECK: &str = "nameserver.check";
const METHOD_NAMESERVER_CREATE: &str = "nameserver.create";
const METHOD_NAMESERVER_CREATE_RECORD: &str = "nameserver.createRecord";
const METHOD_NAMESERVER_DELETE: &str = "nameserver.delete";
const METHOD_NAMESERVER_DELETE_RECORD: &str = "nameserver.deleteRecord";
const METHOD_NAMESERVER_INFO: &str = "nameserver.info";
const METHOD_NAMESERVER_LIST: &str = "nameserver.list";
const METHOD_NAMESERVER_UPDATE: &str = "nameserver.update";
const METHOD_NAMESERVER_UPDATE_RECORD: &str = "nameserver.updateRecord";

/// DNS zones and records hosted on the registrar's nameservers.
#[derive(Debug, Clone, Copy)]
pub struct NameserverService<'c> {
    client: &'c Client,
}

impl<'c> NameserverService<'c> {
    pub(crate) fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Checks whether `nameservers` are set up correctly to serve `domain`.
    pub async fn check(&self, domain: &str, nameservers: &[String]) -> Result<NameserverCheckResponse, Error> {
        let args = Args::new().field("domain", domain).field("ns", nameservers);
        let req = self.client.new_request(METHOD_NAMESERVER_CHECK, args);
        self.client.call_decode(req).await
    }

    /// Creates a zone and returns its `roId`.
    pub async fn create(&self, request: &NameserverCreateRequest) -> Result<i64, Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_CREATE, request.encode());
        let data = self.client.call(req).await?;
        Ok(Fields::new(&data).get("roId")?)
    }

    /// Creates a record and returns its id.
    pub async fn create_record(&self, request: &NameserverRecordRequest) -> Result<i64, Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_CREATE_RECORD, request.encode());
        let data = self.client.call(req).await?;
        Ok(Fields::new(&data).get("id")?)
    }

    /// Deletes a zone along with all of its records.
    pub async fn delete(&self, domain: &str) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_DELETE, Args::new().field("domain", domain));
        self.client.call(req).await?;
        Ok(())
    }

    pub async fn delete_record(&self, record_id: i64) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_DELETE_RECORD, Args::new().field("id", record_id));
        self.client.call(req).await?;
        Ok(())
    }

    /// Gets a zone and its records, filtered by whatever the request sets.
    pub async fn info(&self, request: &NameserverInfoRequest) -> Result<NameserverInfoResponse, Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_INFO, request.encode());
        self.client.call_decode(req).await
    }

    /// Lists zones matching `domain`, or all zones if `domain` is empty.
    ///
    /// Prefer [`list_with_params`][Self::list_with_params], which supports paging.
    pub async fn list(&self, domain: &str) -> Result<NameserverListResponse, Error> {
        let domain = if domain.is_empty() { "*" } else { domain };
        let args = Args::new().field("domain", domain).field("wide", 2);
        let req = self.client.new_request(METHOD_NAMESERVER_LIST, args);
        self.client.call_decode(req).await
    }

    /// Lists zones.
    pub async fn list_with_params(
        &self,
        request: Option<&NameserverListRequest>,
    ) -> Result<NameserverListResponse, Error> {
        let request = request.ok_or(Error::MissingRequest(METHOD_NAMESERVER_LIST))?;

        let mut args = request.encode();
        args.insert("wide", 2);

        let req = self.client.new_request(METHOD_NAMESERVER_LIST, args);
        self.client.call_decode(req).await
    }

    /// Updates a zone's settings.
    pub async fn update(&self, request: &NameserverUpdateRequest) -> Result<(), Error> {
        let req = self.client.new_request(METHOD_NAMESERVER_UPDATE, request.encode());
        self.client.call(req).await?;
        Ok(())
    }

    /// Replaces the record `record_id` with the contents of `request`.
    pub async fn update_record(&self, record_id: i64, request: Option<&NameserverRecordRequest>) -> Result<(), Error> {
        let request = request.ok_or(Error::MissingRequest(METHOD_NAMESERVER_UPDATE_RECORD))?;

        let mut args = request.encode();
        args.insert("id", record_id);

        let req = self.client.new_request(METHOD_NAMESERVER_UPDATE_RECORD, args);
        self.client.call(req).await?;
        Ok(())
    }

    /// Searches every zone on the account for the record with the given id.
    ///
    /// Zones are queried one at a time, in the order `nameserver.list` returns them, stopping at the first match.
    pub async fn find_record_by_id(&self, record_id: i64) -> Result<(NameserverRecord, NameserverDomain), Error> {
        let zones = self.list_with_params(Some(&NameserverListRequest::default())).await?;

        for zone in zones.domains {
            let info = self
                .info(&NameserverInfoRequest {
                    ro_id: zone.ro_id,
                    ..Default::default()
                })
                .await?;

            if let Some(record) = info.records.into_iter().find(|record| record.id == record_id) {
                return Ok((record, zone));
            }
        }

        Err(Error::RecordNotFound(record_id))
    }
}
