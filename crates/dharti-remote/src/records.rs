use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use dharti_core::config::RecordSettings;
use dharti_core::traits::{RecordSource, ServiceResult};
use dharti_core::{ExternalServiceError, RecordKey, RecordRow};

use crate::http::{read_json, required, trim_base, unavailable};

const SERVICE: &str = "records";

/// Listings table behind a PostgREST endpoint.
pub struct PostgrestRecordSource {
    base_url: String,
    api_key: String,
    table: String,
    http: Client,
}

impl PostgrestRecordSource {
    pub fn new(base_url: &str, api_key: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url),
            api_key: api_key.into(),
            table: table.into(),
            http: Client::new(),
        }
    }

    pub fn from_settings(settings: &RecordSettings) -> Result<Self, ExternalServiceError> {
        let base_url = required(SERVICE, &settings.base_url)?;
        let api_key = required(SERVICE, &settings.api_key)?;
        Ok(Self::new(&base_url, api_key, settings.table.clone()))
    }

    async fn lookup(&self, key: &RecordKey) -> ServiceResult<Option<RecordRow>> {
        let (column, filter) = filter_for(key);
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let resp = self
            .http
            .get(&url)
            .query(&[("select", "*"), (column, filter.as_str()), ("limit", "1")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| unavailable(SERVICE, e))?;
        let rows: Vec<RecordRow> = read_json(SERVICE, resp).await?;
        debug!(column, rows = rows.len(), "record lookup");
        Ok(rows.into_iter().next())
    }
}

/// Ids match exactly; owner and location are case-insensitive substrings.
fn filter_for(key: &RecordKey) -> (&'static str, String) {
    match key {
        RecordKey::Id(id) => ("id", format!("eq.{id}")),
        RecordKey::Owner(name) => ("seller_name", format!("ilike.*{name}*")),
        RecordKey::Location(text) => ("location", format!("ilike.*{text}*")),
    }
}

impl RecordSource for PostgrestRecordSource {
    fn find<'a>(&'a self, key: &'a RecordKey) -> BoxFuture<'a, ServiceResult<Option<RecordRow>>> {
        Box::pin(self.lookup(key))
    }
}
