use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

/// Cross-origin access for the browser frontend.
///
/// An empty list disables CORS headers; `"*"` allows any origin.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_enabled(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Config as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub dispatcher: DispatcherInfo,
}

/// Fixed dispatcher parameters, reported for operators.
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherInfo {
    pub attendant_capacity: usize,
    pub attendants: Vec<AttendantInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendantInfo {
    pub attendant_id: u32,
    #[serde(rename = "type")]
    pub ticket_type: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        use crate::dispatcher::{TicketType, ATTENDANT_CAPACITY};

        Self {
            server: config.server.clone(),
            cors: config.cors.clone(),
            dispatcher: DispatcherInfo {
                attendant_capacity: ATTENDANT_CAPACITY,
                attendants: TicketType::ALL
                    .into_iter()
                    .map(|t| AttendantInfo {
                        attendant_id: t.attendant().0,
                        ticket_type: t.as_str().to_string(),
                    })
                    .collect(),
            },
        }
    }
}
