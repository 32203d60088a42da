//! Application configuration for docrelay.
//!
//! User config lives at `~/.docrelay/docrelay.toml`.
//! `DOCRELAY_*` environment variables override config file values, which
//! override defaults. The resolved, immutable [`HandlerConfig`] is what the
//! handler and clients actually consume.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocRelayError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docrelay.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docrelay";

// ---------------------------------------------------------------------------
// Config structs (matching docrelay.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Platform resource identifiers.
    #[serde(default)]
    pub oci: OciConfig,

    /// Object-storage target.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-service endpoint overrides.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Auth settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Invoke-surface server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[oci]` section — identifiers of the managed AI resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OciConfig {
    /// Compartment the ingestion job is created in.
    #[serde(default)]
    pub compartment_id: String,

    /// Knowledge-base data source to re-ingest.
    #[serde(default)]
    pub data_source_id: String,

    /// Agent endpoint queried for document extraction.
    #[serde(default)]
    pub agent_endpoint_id: String,

    /// Region used to derive default service hosts.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-ashburn-1".into()
}

impl Default for OciConfig {
    fn default() -> Self {
        Self {
            compartment_id: String::new(),
            data_source_id: String::new(),
            agent_endpoint_id: String::new(),
            region: default_region(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object-storage namespace.
    #[serde(default)]
    pub namespace: String,

    /// Bucket the extracted text is written to.
    #[serde(default)]
    pub target_bucket: String,
}

/// `[endpoints]` section — optional base-URL overrides per collaborator.
///
/// When unset, hosts are derived from the configured region. Tests point
/// these at a local mock server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Data-ingestion service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_url: Option<String>,

    /// Agent runtime base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_url: Option<String>,

    /// Object-storage base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,
}

/// `[auth]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Name of the env var holding the bearer token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

fn default_token_env() -> String {
    "DOCRELAY_AUTH_TOKEN".into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `docrelay serve`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port for `docrelay serve`.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

// ---------------------------------------------------------------------------
// Handler config (runtime, merged from config file + environment)
// ---------------------------------------------------------------------------

/// Immutable per-process configuration consumed by the handler and clients.
///
/// Built once at startup; each invocation borrows it. Required identifiers
/// are deliberately not validated here: an empty id surfaces as a failure
/// of the downstream call that needed it.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Compartment the ingestion job is created in.
    pub compartment_id: String,
    /// Knowledge-base data source to re-ingest.
    pub data_source_id: String,
    /// Agent endpoint queried for document extraction.
    pub agent_endpoint_id: String,
    /// Object-storage namespace.
    pub namespace: String,
    /// Bucket the extracted text is written to.
    pub target_bucket: String,
    /// Region used to derive default service hosts.
    pub region: String,
    /// Data-ingestion service base URL.
    pub ingestion_base_url: String,
    /// Agent runtime base URL.
    pub agent_base_url: String,
    /// Object-storage base URL.
    pub storage_base_url: String,
    /// Bearer token for the three collaborators, if one is configured.
    pub auth_token: Option<String>,
}

impl HandlerConfig {
    /// Resolve the runtime config from the app config and process environment.
    pub fn resolve(config: &AppConfig) -> Self {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit env lookup, so tests never touch process env.
    pub fn resolve_with(
        config: &AppConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |env_name: &str, file_value: &str| -> String {
            lookup(env_name).unwrap_or_else(|| file_value.to_string())
        };

        let region = pick("DOCRELAY_REGION", &config.oci.region);

        let ingestion_base_url = lookup("DOCRELAY_INGESTION_URL")
            .or_else(|| config.endpoints.ingestion_url.clone())
            .unwrap_or_else(|| default_ingestion_url(&region));
        let agent_base_url = lookup("DOCRELAY_AGENT_URL")
            .or_else(|| config.endpoints.agent_url.clone())
            .unwrap_or_else(|| default_agent_url(&region));
        let storage_base_url = lookup("DOCRELAY_STORAGE_URL")
            .or_else(|| config.endpoints.storage_url.clone())
            .unwrap_or_else(|| default_storage_url(&region));

        Self {
            compartment_id: pick("DOCRELAY_COMPARTMENT_ID", &config.oci.compartment_id),
            data_source_id: pick("DOCRELAY_DATA_SOURCE_ID", &config.oci.data_source_id),
            agent_endpoint_id: pick(
                "DOCRELAY_AGENT_ENDPOINT_ID",
                &config.oci.agent_endpoint_id,
            ),
            namespace: pick("DOCRELAY_NAMESPACE", &config.storage.namespace),
            target_bucket: pick("DOCRELAY_TARGET_BUCKET", &config.storage.target_bucket),
            region,
            ingestion_base_url,
            agent_base_url,
            storage_base_url,
            auth_token: lookup(&config.auth.token_env).filter(|t| !t.is_empty()),
        }
    }
}

/// Default data-ingestion service host for a region.
fn default_ingestion_url(region: &str) -> String {
    format!("https://agent.generativeai.{region}.oci.oraclecloud.com")
}

/// Default agent runtime host for a region.
fn default_agent_url(region: &str) -> String {
    format!("https://agent-runtime.generativeai.{region}.oci.oraclecloud.com")
}

/// Default object-storage host for a region.
fn default_storage_url(region: &str) -> String {
    format!("https://objectstorage.{region}.oraclecloud.com")
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docrelay/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocRelayError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docrelay/docrelay.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocRelayError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocRelayError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocRelayError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocRelayError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocRelayError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("compartment_id"));
        assert!(toml_str.contains("DOCRELAY_AUTH_TOKEN"));
        assert!(toml_str.contains("us-ashburn-1"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.oci.region, "us-ashburn-1");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.auth.token_env, "DOCRELAY_AUTH_TOKEN");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml_str = r#"
[oci]
compartment_id = "ocid1.compartment.oc1..aaaa"
data_source_id = "ocid1.genaiagentdatasource.oc1..bbbb"

[storage]
namespace = "myns"
target_bucket = "extracted-docs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.oci.compartment_id, "ocid1.compartment.oc1..aaaa");
        assert_eq!(config.storage.target_bucket, "extracted-docs");
        assert_eq!(config.oci.region, "us-ashburn-1");
        assert_eq!(config.server.bind, "127.0.0.1");
    }

    #[test]
    fn resolve_prefers_env_over_file() {
        let mut config = AppConfig::default();
        config.oci.compartment_id = "from-file".into();
        config.storage.namespace = "ns-file".into();

        let resolved = HandlerConfig::resolve_with(&config, |name| match name {
            "DOCRELAY_COMPARTMENT_ID" => Some("from-env".into()),
            _ => None,
        });

        assert_eq!(resolved.compartment_id, "from-env");
        assert_eq!(resolved.namespace, "ns-file");
    }

    #[test]
    fn resolve_derives_hosts_from_region() {
        let mut config = AppConfig::default();
        config.oci.region = "eu-frankfurt-1".into();

        let resolved = HandlerConfig::resolve_with(&config, |_| None);

        assert_eq!(
            resolved.ingestion_base_url,
            "https://agent.generativeai.eu-frankfurt-1.oci.oraclecloud.com"
        );
        assert_eq!(
            resolved.storage_base_url,
            "https://objectstorage.eu-frankfurt-1.oraclecloud.com"
        );
    }

    #[test]
    fn resolve_endpoint_override_wins_over_region() {
        let mut config = AppConfig::default();
        config.endpoints.agent_url = Some("http://localhost:9999".into());

        let resolved = HandlerConfig::resolve_with(&config, |_| None);
        assert_eq!(resolved.agent_base_url, "http://localhost:9999");
    }

    #[test]
    fn resolve_reads_token_by_configured_name() {
        let config = AppConfig::default();

        let resolved = HandlerConfig::resolve_with(&config, |name| match name {
            "DOCRELAY_AUTH_TOKEN" => Some("tok-123".into()),
            _ => None,
        });
        assert_eq!(resolved.auth_token.as_deref(), Some("tok-123"));

        // Empty token counts as absent.
        let resolved = HandlerConfig::resolve_with(&config, |name| match name {
            "DOCRELAY_AUTH_TOKEN" => Some(String::new()),
            _ => None,
        });
        assert!(resolved.auth_token.is_none());
    }
}
