// Handshake (initialize) negotiation and session readiness state

use crate::error::{McpError, McpResult};
use crate::protocol::{
    Capabilities, InitializeRequest, InitializeResponse, ServerInfo, PROTOCOL_VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a session has completed the handshake
///
/// Goes from uninitialized to initialized exactly once and never back. The
/// stdio transport owns one per connection; the HTTP transport shares one
/// across requests.
#[derive(Debug, Default)]
pub struct HandshakeState {
    initialized: AtomicBool,
}

impl HandshakeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Returns true if this call performed the transition.
    fn mark_initialized(&self) -> bool {
        self.initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Capabilities advertised in every successful handshake
pub fn server_capabilities() -> Capabilities {
    [
        ("batch", true),
        ("introspection", true),
        ("streaming", false),
        ("tools", true),
    ]
    .into_iter()
    .map(|(name, enabled)| (name.to_string(), enabled))
    .collect()
}

/// Validates client protocol versions and produces the initialize response
#[derive(Debug, Clone)]
pub struct HandshakeGate {
    protocol_version: String,
    capabilities: Capabilities,
    server_info: ServerInfo,
}

impl HandshakeGate {
    pub fn new(server_info: ServerInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: server_capabilities(),
            server_info,
        }
    }

    /// Negotiate a session.
    ///
    /// The requested version must equal the supported one exactly. A mismatch
    /// leaves `state` untouched. Repeating a successful handshake is accepted.
    pub fn negotiate(
        &self,
        state: &HandshakeState,
        request: &InitializeRequest,
    ) -> McpResult<InitializeResponse> {
        if request.protocol_version != self.protocol_version {
            tracing::warn!(
                requested = %request.protocol_version,
                supported = %self.protocol_version,
                "Rejected handshake"
            );
            return Err(McpError::UnsupportedVersion {
                requested: request.protocol_version.clone(),
                supported: self.protocol_version.clone(),
            });
        }

        if state.mark_initialized() {
            tracing::info!(
                protocol_version = %self.protocol_version,
                client_capabilities = ?request.capabilities,
                "Session initialized"
            );
        } else {
            tracing::debug!("Handshake repeated on initialized session");
        }

        Ok(InitializeResponse {
            protocol_version: self.protocol_version.clone(),
            capabilities: self.capabilities.clone(),
            server_info: self.server_info.clone(),
        })
    }
}
