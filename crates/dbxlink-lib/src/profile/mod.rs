//! Linked-account profile: display, link and delink.

use serde::Serialize;

use crate::actions::AuthorizationHandshake;
use crate::backend::{AccountInfo, RepositoryClient};
use crate::errors::Result;

const MEGABYTE: u64 = 1024 * 1024;
const GIGABYTE: u64 = 1024 * 1024 * 1024;

/// Human-readable size: GB from one gibibyte upwards, MB below.
/// Whole multiples print without decimals, the rest round to two places.
pub fn format_size(bytes: u64) -> String {
    let (unit, suffix) = if bytes >= GIGABYTE {
        (GIGABYTE, "GB")
    } else {
        (MEGABYTE, "MB")
    };
    if bytes % unit == 0 {
        format!("{} {}", bytes / unit, suffix)
    } else {
        let value = (bytes as f64 / unit as f64 * 100.0).round() / 100.0;
        format!("{} {}", value, suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quota {
    pub bytes: u64,
    pub display: String,
}

impl From<u64> for Quota {
    fn from(bytes: u64) -> Self {
        Self {
            bytes,
            display: format_size(bytes),
        }
    }
}

/// Profile of a linked external account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountProfile {
    pub display_name: String,
    pub email: String,
    pub quota: Quota,
    pub quota_normal: Quota,
    pub quota_shared: Quota,
}

impl AccountProfile {
    /// `None` when the account is not linked.
    pub fn from_info(info: AccountInfo) -> Option<Self> {
        if !info.authenticated {
            return None;
        }
        Some(Self {
            display_name: info.display_name.unwrap_or_default(),
            email: info.email.unwrap_or_default(),
            quota: info.quota.unwrap_or(0).into(),
            quota_normal: info.quota_normal.unwrap_or(0).into(),
            quota_shared: info.quota_shared.unwrap_or(0).into(),
        })
    }

    /// Rows for a two-column listing.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.display_name.clone()),
            ("Email", self.email.clone()),
            ("Quota", self.quota.display.clone()),
            ("Used", self.quota_normal.display.clone()),
            ("Shared", self.quota_shared.display.clone()),
        ]
    }
}

pub async fn fetch_profile(client: &RepositoryClient) -> Result<Option<AccountProfile>> {
    Ok(AccountProfile::from_info(client.account().await?))
}

/// Fetch the consent URL and open it in the authorization window.
/// Returns the URL that was opened.
pub async fn link(
    client: &RepositoryClient,
    handshake: &AuthorizationHandshake,
    callback: &str,
) -> Result<String> {
    let url = client.link_url(callback).await?;
    handshake.open(&url)?;
    Ok(url)
}

/// Drop the stored link. `Ok(false)` when the repository refused.
pub async fn delink(client: &RepositoryClient) -> Result<bool> {
    let removed = client.delink().await?;
    if removed {
        tracing::info!("account link removed");
    } else {
        tracing::warn!("repository refused to remove the account link");
    }
    Ok(removed)
}
