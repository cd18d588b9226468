//! HTTP client for the repository's Dropbox proxy endpoints.
//!
//! All paths are relative to the configured `proxyUri`. When a session
//! ticket is configured it is sent as the `alf_ticket` query parameter on
//! every request.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::actions::{AuthStatus, OperationKind, TransferResponse};
use crate::config::DynamicConfig;
use crate::errors::{DbxError, Result};
use crate::host::RepositoryBackend;
use crate::http_client::HttpClient;

/// Payload of `GET dropbox/account`. Profile fields are only present for a
/// linked account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_normal: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_shared: Option<u64>,
}

impl From<AccountInfo> for AuthStatus {
    fn from(info: AccountInfo) -> Self {
        AuthStatus {
            authenticated: info.authenticated,
            auth_url: info.auth_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct NodeRefsBody<'a> {
    #[serde(rename = "nodeRefs")]
    node_refs: &'a [String],
}

#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    #[serde(rename = "authURL")]
    auth_url: String,
}

#[derive(Debug, Deserialize)]
struct SuccessResponse {
    success: bool,
}

/// Repository proxy client.
#[derive(Clone)]
pub struct RepositoryClient {
    http: HttpClient,
    base: Url,
    ticket: Option<String>,
    user: String,
}

impl RepositoryClient {
    pub fn new(http: HttpClient, config: &DynamicConfig) -> Result<Self> {
        let mut raw = config.proxy_uri.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw)
            .map_err(|e| DbxError::Config(format!("invalid proxyUri {:?}: {}", config.proxy_uri, e)))?;
        let ticket = Some(config.alf_ticket.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Ok(Self {
            http,
            base,
            ticket,
            user: config.user_name.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| DbxError::Config(format!("invalid endpoint {}: {}", path, e)))?;
        if let Some(ticket) = &self.ticket {
            url.query_pairs_mut().append_pair("alf_ticket", ticket);
        }
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, path = %url.path(), "repository request");
        self.http.get_client().await.request(method, url)
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DbxError::Server {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// Full account payload including profile fields.
    pub async fn account(&self) -> Result<AccountInfo> {
        let url = self.endpoint("dropbox/account")?;
        let resp = self
            .request(Method::GET, url)
            .await
            .query(&[("callback", self.base.as_str())])
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// Consent URL for linking an account from the profile page.
    pub async fn link_url(&self, callback: &str) -> Result<String> {
        let url = self.endpoint("dropbox/account/authurl")?;
        let resp = self
            .request(Method::GET, url)
            .await
            .query(&[("callback", callback)])
            .send()
            .await?;
        let body: AuthUrlResponse = Self::read_json(resp).await?;
        Ok(body.auth_url)
    }

    /// Remove the stored link for the configured user.
    pub async fn delink(&self) -> Result<bool> {
        if self.user.trim().is_empty() {
            return Err(DbxError::Config(
                "userName is not set; run `dbxlink config set userName <name>`".into(),
            ));
        }
        let mut url = self.endpoint("dropbox/account")?;
        url.path_segments_mut()
            .map_err(|_| DbxError::Config("proxyUri cannot be a base URL".into()))?
            .push(&self.user);
        let resp = self.request(Method::DELETE, url).await.send().await?;
        let body: SuccessResponse = Self::read_json(resp).await?;
        Ok(body.success)
    }
}

#[async_trait]
impl RepositoryBackend for RepositoryClient {
    async fn check_auth_status(&self) -> Result<AuthStatus> {
        Ok(self.account().await?.into())
    }

    async fn transfer(&self, kind: OperationKind, node_refs: &[String]) -> Result<TransferResponse> {
        let body = NodeRefsBody { node_refs };
        let builder = match kind {
            OperationKind::SendTo => self
                .request(Method::POST, self.endpoint("dropbox/node")?)
                .await
                .json(&body),
            // A stock repository reads `nodeRefs` here as one NodeRef; batching
            // several refs needs a proxy that splits the comma-joined list.
            OperationKind::GetFrom => self
                .request(Method::GET, self.endpoint("dropbox/node")?)
                .await
                .query(&[("nodeRefs", node_refs.join(","))]),
            OperationKind::Remove => self
                .request(Method::POST, self.endpoint("dropbox/removenode")?)
                .await
                .json(&body),
        };

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%kind, status = status.as_u16(), "repository rejected transfer");
        }
        Ok(TransferResponse {
            success: status.is_success(),
        })
    }
}
