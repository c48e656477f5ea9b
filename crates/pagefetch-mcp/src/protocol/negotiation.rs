//! Handshake state.

use crate::types::{InitializeParams, InitializeResult, PeerInfo, MCP_VERSION};

/// What the server knows about its client after `initialize`.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: Option<PeerInfo>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Accept any client version; the server always answers with its own.
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, answering with {}",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );
        self.client = Some(params.client_info);

        InitializeResult::current()
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::debug!("MCP handshake complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            client_info: PeerInfo {
                name: "agent".to_string(),
                version: "0.1".to_string(),
            },
        }
    }

    #[test]
    fn test_negotiate_answers_with_server_version() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(params("2099-01-01"));
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert_eq!(caps.client.as_ref().map(|c| c.name.as_str()), Some("agent"));
        assert!(!caps.initialized);

        caps.mark_initialized();
        assert!(caps.initialized);
    }
}
