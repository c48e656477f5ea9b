//! Payloads of the `initialize` handshake.

use serde::{Deserialize, Serialize};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "pagefetch-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "pagefetch performs single HTTP requests and shapes their payloads. \
     Use fetch_api to call an endpoint, optionally extracting the record embedded in a \
     server-rendered page. Use process_data to filter or summarise JSON or HTML you already have.";

/// Name and version of a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    pub name: String,
    pub version: String,
}

/// Client half of the handshake. The client's capability block is not read;
/// the server never calls back into the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub client_info: PeerInfo,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// Tools are the only thing this server offers.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: PeerInfo,
    pub instructions: &'static str,
}

impl InitializeResult {
    pub fn current() -> Self {
        Self {
            protocol_version: MCP_VERSION,
            capabilities: ServerCapabilities::default(),
            server_info: PeerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: INSTRUCTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_advertises_tools_only() {
        let value = serde_json::to_value(InitializeResult::current()).unwrap();
        assert_eq!(value["capabilities"], json!({"tools": {"listChanged": false}}));
        assert_eq!(value["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(value["protocolVersion"], MCP_VERSION);
    }

    #[test]
    fn test_params_ignore_client_capabilities() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {"sampling": {}, "roots": {"listChanged": true}},
            "clientInfo": {"name": "desk", "version": "2.1"}
        }))
        .unwrap();
        assert_eq!(params.client_info.name, "desk");
    }
}
