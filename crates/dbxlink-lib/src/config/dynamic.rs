use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DynamicConfig {
    #[serde(rename = "proxyUri")]
    pub proxy_uri: String,
    #[serde(rename = "alfTicket")]
    pub alf_ticket: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "indicatorDelayMs")]
    pub indicator_delay_ms: u64,
    #[serde(rename = "destroyPollMs")]
    pub destroy_poll_ms: u64,
    #[serde(rename = "popupWindowName")]
    pub popup_window_name: String,
    #[serde(rename = "popupFeatures")]
    pub popup_features: String,
    pub timeout: u32,
    #[serde(rename = "connectTimeout")]
    pub connect_timeout: u32,
    #[serde(rename = "idleConnTimeout")]
    pub idle_conn_timeout: u32,
    #[serde(rename = "maxIdleConnsPerHost")]
    pub max_idle_conns_per_host: u32,
    pub messages: BTreeMap<String, String>,
}

impl DynamicConfig {
    /// Delay between `begin()` and the indicator being asked to render.
    pub fn indicator_delay(&self) -> Duration {
        Duration::from_millis(self.indicator_delay_ms)
    }

    /// Interval at which a deferred destroy reports that it is still waiting.
    pub fn destroy_poll(&self) -> Duration {
        Duration::from_millis(self.destroy_poll_ms.max(1))
    }
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            proxy_uri: "http://localhost:8080/share/proxy/alfresco/".into(),
            alf_ticket: String::new(),
            user_name: String::new(),
            indicator_delay_ms: 0,
            destroy_poll_ms: 100,
            popup_window_name: "DBOAuthwindow".into(),
            popup_features: "location=1,status=1,scrollbars=1,width=960,height=900,left=0,top=0"
                .into(),
            timeout: 30,
            connect_timeout: 10,
            idle_conn_timeout: 90,
            max_idle_conns_per_host: 16,
            messages: BTreeMap::new(),
        }
    }
}
