use super::endpoints::{resource_url, ServiceEndpoints};
use super::error::{ProviderError, ProviderResult};
use super::signer::RequestSigner;
use super::traits::{ComputeService, DatabaseService, MySqlService};
use super::types::{
    ActionReceipt, AutonomousDatabase, DbSystem, Instance, InstanceAction, ShutdownType,
};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_LIST_PAGES: usize = 100;

/// Error body returned by OCI services on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Signed HTTP client for the OCI REST API.
#[derive(Debug)]
pub struct OciClient {
    http: Client,
    signer: RequestSigner,
    endpoints: ServiceEndpoints,
}

impl OciClient {
    pub fn new(signer: RequestSigner, endpoints: ServiceEndpoints) -> ProviderResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("occctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            signer,
            endpoints,
        })
    }

    /// Signs and sends a request, turning non-2xx responses into `ProviderError::Service`.
    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> ProviderResult<Response> {
        let payload = match &body {
            Some(value) => Some(serde_json::to_vec(value)?),
            None => None,
        };
        let signed = self.signer.sign(&method, &url, payload.as_deref())?;

        tracing::debug!(method = %method, url = %url, "Sending OCI request");
        let mut request = self.http.request(method.clone(), url.clone());
        for (name, value) in signed {
            request = request.header(name, value);
        }
        if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
            request = request.body(payload.unwrap_or_default());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = %status, url = %url, "OCI request succeeded");
            return Ok(response);
        }

        let request_id = header_value(response.headers(), "opc-request-id");
        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ServiceErrorBody>(&text) {
            Ok(body) => (body.code, body.message),
            Err(_) => (status.canonical_reason().unwrap_or("Unknown").to_string(), text),
        };
        tracing::debug!(status = %status, code = %code, "OCI request failed");

        Err(ProviderError::Service {
            status: status.as_u16(),
            code,
            message,
            request_id,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> ProviderResult<T> {
        let response = self.send(method, url, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_action(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> ProviderResult<ActionReceipt> {
        let response = self.send(method, url, body).await?;
        Ok(receipt_from_headers(response.headers()))
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn receipt_from_headers(headers: &HeaderMap) -> ActionReceipt {
    ActionReceipt {
        request_id: header_value(headers, "opc-request-id"),
        work_request_id: header_value(headers, "opc-work-request-id"),
    }
}

#[async_trait]
impl DatabaseService for OciClient {
    async fn get_autonomous_database(&self, id: &str) -> ProviderResult<AutonomousDatabase> {
        let url = resource_url(&self.endpoints.database, &["autonomousDatabases", id])?;
        self.send_json(Method::GET, url, None).await
    }

    async fn update_compute_count(
        &self,
        id: &str,
        compute_count: u32,
    ) -> ProviderResult<AutonomousDatabase> {
        let url = resource_url(&self.endpoints.database, &["autonomousDatabases", id])?;
        self.send_json(
            Method::PUT,
            url,
            Some(json!({ "computeCount": compute_count })),
        )
        .await
    }
}

#[async_trait]
impl ComputeService for OciClient {
    async fn list_instances(&self, compartment_id: &str) -> ProviderResult<Vec<Instance>> {
        let mut instances = Vec::new();
        let mut page: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let mut url = resource_url(&self.endpoints.compute, &["instances"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("compartmentId", compartment_id);
                if let Some(token) = &page {
                    query.append_pair("page", token);
                }
            }

            let response = self.send(Method::GET, url, None).await?;
            page = header_value(response.headers(), "opc-next-page");
            let bytes = response.bytes().await?;
            let batch: Vec<Instance> = serde_json::from_slice(&bytes)?;
            tracing::debug!("Fetched {} instance(s)", batch.len());
            instances.extend(batch);

            if page.is_none() {
                return Ok(instances);
            }
        }

        tracing::warn!(
            "Instance listing stopped after {} pages; results may be incomplete",
            MAX_LIST_PAGES
        );
        Ok(instances)
    }

    async fn instance_action(&self, id: &str, action: InstanceAction) -> ProviderResult<Instance> {
        let mut url = resource_url(&self.endpoints.compute, &["instances", id])?;
        url.query_pairs_mut().append_pair("action", action.as_str());
        self.send_json(Method::POST, url, None).await
    }
}

#[async_trait]
impl MySqlService for OciClient {
    async fn get_db_system(&self, id: &str) -> ProviderResult<DbSystem> {
        let url = resource_url(&self.endpoints.mysql, &["dbSystems", id])?;
        self.send_json(Method::GET, url, None).await
    }

    async fn start_db_system(&self, id: &str) -> ProviderResult<ActionReceipt> {
        let url = resource_url(&self.endpoints.mysql, &["dbSystems", id, "actions", "start"])?;
        self.send_action(Method::POST, url, None).await
    }

    async fn stop_db_system(
        &self,
        id: &str,
        shutdown_type: ShutdownType,
    ) -> ProviderResult<ActionReceipt> {
        let url = resource_url(&self.endpoints.mysql, &["dbSystems", id, "actions", "stop"])?;
        self.send_action(
            Method::POST,
            url,
            Some(json!({ "shutdownType": shutdown_type })),
        )
        .await
    }
}
