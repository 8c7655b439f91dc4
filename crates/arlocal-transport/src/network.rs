use anyhow::{anyhow, Result};
use arlocal_types::env_string_or;

use crate::client::ApiConfig;

const MAINNET_GATEWAY: &str = "https://arweave.net";
const ARLOCAL_DEFAULT: &str = "http://localhost:1984";

pub fn default_arlocal_url() -> &'static str {
    ARLOCAL_DEFAULT
}

/// Gateway URL from `ARWEAVE_GATEWAY_URL`, falling back to `https://arweave.net`.
pub fn resolve_gateway_url() -> String {
    env_string_or("ARWEAVE_GATEWAY_URL", MAINNET_GATEWAY)
}

/// Parse `protocol://host[:port][/]` into an [`ApiConfig`].
pub fn parse_gateway_url(url: &str) -> Result<ApiConfig> {
    let url = url.trim().trim_end_matches('/');
    let (protocol, rest) = url
        .split_once("://")
        .ok_or_else(|| anyhow!("Gateway URL '{}' has no protocol", url))?;
    let protocol = protocol.to_lowercase();
    let default_port = match protocol.as_str() {
        "https" => 443,
        "http" => 80,
        other => return Err(anyhow!("Unsupported gateway protocol '{}'", other)),
    };
    if rest.is_empty() || rest.contains('/') {
        return Err(anyhow!("Gateway URL '{}' must be protocol://host[:port]", url));
    }

    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid gateway port '{}': {}", port, e))?;
            (host, port)
        }
        None => (rest, default_port),
    };

    Ok(ApiConfig::new(protocol, host, port))
}

/// Whether the endpoint looks like a local test node rather than a public
/// gateway.
pub fn is_local_endpoint(config: &ApiConfig) -> bool {
    matches!(config.host.as_str(), "localhost" | "127.0.0.1" | "0.0.0.0")
}
