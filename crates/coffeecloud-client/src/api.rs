//! Typed CoffeeCloud API calls and the source seams used by the sync engine

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AuthSession;
use crate::error::Result;
use crate::http::{CoffeeCloudHttpClient, HttpClientConfig};
use crate::model::{Group, HealthRecord, MachineErrorRecord, MachineRecord};
use crate::paging::{NaturalKey, Page, PageRequest, collect_pages, dedup_by_natural_key};

pub const GROUPS_PATH: &str = "/rest/groups";
pub const MACHINES_PATH: &str = "/rest/overview/data";
pub const MACHINE_ERRORS_PATH: &str = "/rest/dashboard/error/search";
pub const HEALTH_KPI_PATH: &str = "/rest/dashboard/healthkpi";

/// Opens authenticated sessions against a source system
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Authenticate and return a session valid for one collection cycle
    async fn open(&self, config: &HttpClientConfig) -> Result<Box<dyn SourceSession>>;
}

/// Listings available within one authenticated session
#[async_trait]
pub trait SourceSession: Send + Sync {
    async fn groups(&self) -> Result<Vec<Group>>;

    async fn machines(&self, group_id: u64) -> Result<Vec<MachineRecord>>;

    async fn machine_errors(&self, group_id: u64) -> Result<Vec<MachineErrorRecord>>;

    async fn health_statuses(&self, group_id: u64) -> Result<Vec<HealthRecord>>;
}

/// Connector for the CoffeeCloud REST API
#[derive(Clone, Copy, Debug, Default)]
pub struct CoffeeCloudConnector;

#[async_trait]
impl SourceConnector for CoffeeCloudConnector {
    async fn open(&self, config: &HttpClientConfig) -> Result<Box<dyn SourceSession>> {
        let client = CoffeeCloudApiClient::connect(config.clone()).await?;
        Ok(Box::new(client))
    }
}

/// Authenticated CoffeeCloud client for one tenant
pub struct CoffeeCloudApiClient {
    http: CoffeeCloudHttpClient,
    session: AuthSession,
}

impl CoffeeCloudApiClient {
    /// Build the transport and log in
    pub async fn connect(config: HttpClientConfig) -> Result<Self> {
        let http = CoffeeCloudHttpClient::new(config)?;
        let session = AuthSession::login(&http).await?;
        Ok(Self { http, session })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    async fn fetch_paged<T>(&self, path: &str, group_id: u64, newest_first: bool) -> Result<Vec<T>>
    where
        T: DeserializeOwned + NaturalKey,
    {
        let query = [("groupid", group_id.to_string())];
        let token = self.session.token();

        let records = collect_pages(|offset| {
            let request = if newest_first {
                PageRequest::at(offset).newest_first()
            } else {
                PageRequest::at(offset)
            };
            let query = &query;
            async move {
                self.http
                    .post_json::<Page<T>, _>(path, query, &request, Some(token))
                    .await
            }
        })
        .await?;

        debug!("Fetched {} records from {} for group {}", records.len(), path, group_id);
        Ok(records)
    }
}

#[async_trait]
impl SourceSession for CoffeeCloudApiClient {
    async fn groups(&self) -> Result<Vec<Group>> {
        let groups: Vec<Group> = self.http.get(GROUPS_PATH, self.session.token()).await?;
        Ok(dedup_by_natural_key(groups))
    }

    async fn machines(&self, group_id: u64) -> Result<Vec<MachineRecord>> {
        self.fetch_paged(MACHINES_PATH, group_id, false).await
    }

    async fn machine_errors(&self, group_id: u64) -> Result<Vec<MachineErrorRecord>> {
        self.fetch_paged(MACHINE_ERRORS_PATH, group_id, true).await
    }

    async fn health_statuses(&self, group_id: u64) -> Result<Vec<HealthRecord>> {
        self.fetch_paged(HEALTH_KPI_PATH, group_id, true).await
    }
}
