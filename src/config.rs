use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub vendor: VendorConfig,
    #[serde(default)]
    pub rtt: RttConfig,
    /// Optional cloud-storage output for transcripts. When present, the
    /// storage destination is added to every task request.
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Vendor project credentials, read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub app_id: String,
    pub app_certificate: String,
    pub customer_id: String,
    pub customer_secret: String,
    /// Outbound request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RttConfig {
    /// Instance identifier sent when acquiring a builder token.
    #[serde(default = "default_instance_id")]
    pub instance_id: String,

    /// Recognition language code(s); at most two, comma-separated
    /// (e.g. "en-US,ja-JP").
    #[serde(default = "default_language")]
    pub language: String,

    /// The vendor stops the task automatically after this many seconds
    /// without audio in the channel.
    #[serde(default = "default_max_idle_time")]
    pub max_idle_time_secs: u32,

    /// Media token validity window.
    #[serde(default = "default_expiry")]
    pub token_expiry_secs: u32,

    /// Publishing-privilege validity window.
    #[serde(default = "default_expiry")]
    pub privilege_expiry_secs: u32,

    /// Uid of the audio-subscribing bot identity.
    #[serde(default = "default_audio_uid")]
    pub audio_uid: u32,

    /// Uid of the text-publishing bot identity.
    #[serde(default = "default_text_uid")]
    pub text_uid: u32,

    /// When true, a fresh builder token is acquired at the start of every
    /// task-start call; when false, one is acquired lazily and reused for
    /// the life of the process. Set according to the vendor's builder-token
    /// lifetime.
    #[serde(default)]
    pub refresh_token_per_call: bool,
}

impl Default for RttConfig {
    fn default() -> Self {
        Self {
            instance_id: default_instance_id(),
            language: default_language(),
            max_idle_time_secs: default_max_idle_time(),
            token_expiry_secs: default_expiry(),
            privilege_expiry_secs: default_expiry(),
            audio_uid: default_audio_uid(),
            text_uid: default_text_uid(),
            refresh_token_per_call: false,
        }
    }
}

/// Object-storage credentials for the optional transcript recording
/// destination.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub vendor_id: u32,
    pub region: u32,
    #[serde(default)]
    pub file_name_prefix: Vec<String>,
}

fn default_base_url() -> String {
    "https://api.agora.io".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_instance_id() -> String {
    "RTT_Test".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_max_idle_time() -> u32 {
    120
}

fn default_expiry() -> u32 {
    3600
}

fn default_audio_uid() -> u32 {
    111
}

fn default_text_uid() -> u32 {
    222
}

impl Config {
    /// Load configuration from an optional TOML file layered under
    /// environment variables (prefix `RTT`, `__` nesting separator, e.g.
    /// `RTT_VENDOR__APP_ID`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("RTT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtt_defaults_match_vendor_sample() {
        let rtt = RttConfig::default();
        assert_eq!(rtt.instance_id, "RTT_Test");
        assert_eq!(rtt.audio_uid, 111);
        assert_eq!(rtt.text_uid, 222);
        assert_eq!(rtt.max_idle_time_secs, 120);
        assert_eq!(rtt.token_expiry_secs, 3600);
        assert_eq!(rtt.privilege_expiry_secs, 3600);
        assert!(!rtt.refresh_token_per_call);
    }

    #[test]
    fn storage_section_is_optional() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [service]
                name = "rtt-gateway"
                [service.http]
                bind = "127.0.0.1"
                port = 3000
                [vendor]
                app_id = "app"
                app_certificate = "cert"
                customer_id = "cust"
                customer_secret = "secret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(cfg.storage.is_none());
        assert_eq!(cfg.vendor.base_url, "https://api.agora.io");
        assert_eq!(cfg.rtt.language, "en-US");
    }
}
