//! HTTP session against the engine REST API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Certificate, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::error::ApiError;
use crate::inventory::InventorySource;
use crate::types::{
    DataCenter, DataCenterList, Fault, Host, HostList, HostNic, HostNicList, MacPool, Network,
    NetworkList, Nic, NicList, SetupNetworksAction, Vm, VmList,
};
use crate::Result;

/// API version requested from the engine
const API_VERSION: &str = "4";

/// Open connection to one engine.
///
/// Every request carries basic-auth credentials; the handle is passed
/// explicitly to whatever needs the engine and closed when done.
pub struct Session {
    client: Client,
    url: String,
    base_url: String,
    username: String,
    password: String,
}

impl Session {
    /// Connect to the engine described by `config` and verify the credentials
    pub async fn open(config: &ConnectionConfig) -> Result<Self> {
        let session = Self::new(config)?;

        log::debug!("Opening session to {} as {}", session.url, session.username);
        let _: serde_json::Value = session.get("", &[]).await?;
        log::info!("Connected to {}", session.url);

        Ok(session)
    }

    /// Build a session without contacting the engine
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.url)?;
        let password = config.password.clone().ok_or(ApiError::Authentication)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("version", HeaderValue::from_static(API_VERSION));

        let mut builder = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure());

        if let Some(path) = &config.ca_file {
            let certificate_error = |message: String| ApiError::Certificate {
                path: path.display().to_string(),
                message,
            };
            let pem = std::fs::read(path).map_err(|e| certificate_error(e.to_string()))?;
            let certificate =
                Certificate::from_pem(&pem).map_err(|e| certificate_error(e.to_string()))?;
            builder = builder.add_root_certificate(certificate);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
            base_url,
            username: config.username.clone(),
            password,
        })
    }

    /// API entry point as configured
    pub fn url(&self) -> &str {
        &self.url
    }

    /// End the session
    pub fn close(self) {
        log::debug!("Closing session to {}", self.url);
    }

    pub(crate) fn build_url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);

        if !query.is_empty() {
            url.push('?');
            let query_string: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push_str(&query_string.join("&"));
        }

        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path, query);
        log::debug!("GET {}", url);

        let response = self.request(Method::GET, &url).send().await?;
        read_response(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path, &[]);
        log::debug!("POST {}", url);

        let response = self.request(Method::POST, &url).json(body).send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl InventorySource for Session {
    async fn list_data_centers(&self) -> Result<Vec<DataCenter>> {
        let list: DataCenterList = self.get("datacenters", &[]).await?;
        Ok(list.data_center)
    }

    async fn get_mac_pool(&self, id: &str) -> Result<MacPool> {
        self.get(&format!("macpools/{}", urlencoding::encode(id)), &[])
            .await
    }

    async fn list_vms(&self, search: &str) -> Result<Vec<Vm>> {
        let list: VmList = self.get("vms", &[("search", search)]).await?;
        Ok(list.vm)
    }

    async fn list_vm_nics(&self, vm_id: &str) -> Result<Vec<Nic>> {
        let path = format!("vms/{}/nics", urlencoding::encode(vm_id));
        let list: NicList = self.get(&path, &[]).await?;
        Ok(list.nic)
    }

    async fn find_host(&self, name: &str) -> Result<Host> {
        let search = name_search(name);
        let list: HostList = self.get("hosts", &[("search", search.as_str())]).await?;
        list.host
            .into_iter()
            .find(|host| host.name == name)
            .ok_or_else(|| ApiError::NotFound {
                kind: "host",
                name: name.to_string(),
            })
    }

    async fn find_network(&self, name: &str) -> Result<Network> {
        let search = name_search(name);
        let list: NetworkList = self.get("networks", &[("search", search.as_str())]).await?;
        list.network
            .into_iter()
            .find(|network| network.name == name)
            .ok_or_else(|| ApiError::NotFound {
                kind: "network",
                name: name.to_string(),
            })
    }

    async fn list_host_nics(&self, host_id: &str) -> Result<Vec<HostNic>> {
        let path = format!("hosts/{}/nics", urlencoding::encode(host_id));
        let list: HostNicList = self.get(&path, &[]).await?;
        Ok(list.host_nic)
    }

    async fn setup_networks(&self, host_id: &str, action: &SetupNetworksAction) -> Result<()> {
        let path = format!("hosts/{}/setupnetworks", urlencoding::encode(host_id));
        let _: serde_json::Value = self.post(&path, action).await?;
        Ok(())
    }
}

/// Validate the configured URL and make sure relative paths join below it
/// Engine search expression matching an entity by exact name
pub(crate) fn name_search(name: &str) -> String {
    format!("name=\"{}\"", name)
}

pub(crate) fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ApiError::InvalidUrl(url.to_string()));
    }

    let mut base = trimmed.trim_end_matches('/').to_string();
    base.push('/');
    Ok(base)
}

async fn read_response<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Authentication);
    }

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    log::debug!(
        "API response: status={}, body_size={}",
        status.as_u16(),
        body.len()
    );
    decode_body(&body)
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> ApiError {
    let fault: Fault = serde_json::from_str(body).unwrap_or_default();

    ApiError::Status {
        status: status.as_u16(),
        reason: fault
            .reason
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string()),
        detail: fault.detail.unwrap_or_default(),
    }
}

pub(crate) fn decode_body<T>(body: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::ParseError(format!("JSON parse error: {}", e)))
}
