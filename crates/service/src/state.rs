use std::sync::Arc;

use common::capability::CapabilityKey;
use common::sandbox::{Sandbox, SandboxError};
use rand::RngCore;

use crate::auth::{IdentityVerifier, JwtIdentityVerifier};
use crate::config::Config;
use crate::tools::{ToolCatalog, ToolCatalogError};

/// Main service state - built once at startup, cloned into handlers.
#[derive(Clone)]
pub struct State {
    inner: Arc<StateInner>,
}

struct StateInner {
    sandbox: Sandbox,
    capability_key: CapabilityKey,
    verifier: Arc<dyn IdentityVerifier>,
    tools: ToolCatalog,
    max_preview_bytes: u64,
    default_ttl_secs: u64,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Pin the sandbox root
        let root = match config.root.clone() {
            Some(root) => root,
            None => dirs::home_dir().ok_or(StateSetupError::NoRootAvailable)?,
        };
        let sandbox = Sandbox::new(&root)?;
        tracing::info!(root = %sandbox.root().display(), "sandbox root pinned");

        // 2. Key material for sessions and signed URLs
        let secret = match config.secret.clone() {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                tracing::warn!(
                    "no signing secret configured; using a generated one, \
                     sessions and signed URLs will not survive a restart"
                );
                hex::encode(bytes)
            }
        };
        let capability_key = CapabilityKey::from_secret(secret.as_bytes());
        let verifier: Arc<dyn IdentityVerifier> =
            Arc::new(JwtIdentityVerifier::new(secret.as_bytes()));

        // 3. Tool catalog, loaded once and read-only afterwards
        let tools = match config.tools_file.as_deref() {
            Some(path) => ToolCatalog::load_toml(path)?,
            None => ToolCatalog::builtin(),
        };
        tracing::info!(
            total = tools.len(),
            active = tools.active().len(),
            "tool catalog loaded"
        );

        Ok(Self {
            inner: Arc::new(StateInner {
                sandbox,
                capability_key,
                verifier,
                tools,
                max_preview_bytes: config.max_preview_bytes,
                default_ttl_secs: config.default_ttl_secs,
            }),
        })
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.inner.sandbox
    }

    pub fn capabilities(&self) -> &CapabilityKey {
        &self.inner.capability_key
    }

    pub fn verifier(&self) -> &Arc<dyn IdentityVerifier> {
        &self.inner.verifier
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.inner.tools
    }

    pub fn max_preview_bytes(&self) -> u64 {
        self.inner.max_preview_bytes
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.inner.default_ttl_secs
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("no sandbox root configured and no home directory available")]
    NoRootAvailable,
    #[error("sandbox setup error: {0}")]
    Sandbox(#[from] SandboxError),
    #[error("tool catalog error: {0}")]
    ToolCatalog(#[from] ToolCatalogError),
}
