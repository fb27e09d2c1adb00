use crate::core::normalizer::Architecture;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub genai: GenAiConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:3000".to_string(),
            ],
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX export of the trained classifier
    pub model_path: PathBuf,
    /// Ordered class names, JSON array or one name per line
    pub class_names_path: PathBuf,
    pub architecture: Architecture,
    pub input_height: u32,
    pub input_width: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("plant_disease_resnet50_model.onnx"),
            class_names_path: PathBuf::from("class_names.json"),
            architecture: Architecture::ResNet50,
            input_height: 224,
            input_width: 224,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenAiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl GenAiConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), GEMINI_API_KEY_ENV)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com".to_string(),
            api_key: None,
        }
    }
}

impl SearchConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), YOUTUBE_API_KEY_ENV)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Append every detection (raw label, language, cure text) to `detections.jsonl`
    pub log_detections: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            log_detections: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub token: String,
    pub id: i64,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    let usable = |value: &str| !value.trim().is_empty() && !validation::is_unresolved_placeholder(value);

    match configured {
        Some(value) if usable(value) => Some(value.trim().to_string()),
        _ => std::env::var(env_var).ok().filter(|value| usable(value)),
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.max_upload_bytes", self.server.max_upload_bytes, 1024, 512 * 1024 * 1024)?;

        validation::validate_path("model.model_path", &self.model.model_path.to_string_lossy())?;
        validation::validate_path("model.class_names_path", &self.model.class_names_path.to_string_lossy())?;
        validation::validate_range("model.input_height", self.model.input_height, 8, 4096)?;
        validation::validate_range("model.input_width", self.model.input_width, 8, 4096)?;

        validation::validate_url("genai.base_url", &self.genai.base_url)?;
        validation::validate_non_empty_string("genai.model", &self.genai.model)?;
        validation::validate_url("search.base_url", &self.search.base_url)?;

        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;

        for (i, entry) in self.auth.tokens.iter().enumerate() {
            if entry.token.trim().is_empty() || validation::is_unresolved_placeholder(&entry.token) {
                return Err(AppError::InvalidConfigValue {
                    field: format!("auth.tokens[{}].token", i),
                    value: entry.token.clone(),
                    reason: "Token must be a non-empty literal".to_string(),
                });
            }
        }

        for origin in &self.server.cors_origins {
            validation::validate_url("server.cors_origins", origin)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.input_height, 224);
        assert_eq!(config.model.architecture, Architecture::ResNet50);
        assert_eq!(config.genai.model, "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_document() {
        let content = r#"
[server]
host = "127.0.0.1"
port = 9100
cors_origins = ["http://localhost:5173"]

[model]
model_path = "models/plant.onnx"
class_names_path = "models/classes.txt"
architecture = "mobilenet_v2"
input_height = 160
input_width = 160

[genai]
model = "gemini-2.0-flash"
api_key = "literal-key"

[storage]
data_dir = "/var/lib/rural-edu"
log_detections = true

[[auth.tokens]]
token = "t-1"
id = 1
email = "asha@example.org"
username = "asha"

[logging]
format = "json"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert_eq!(config.model.architecture, Architecture::MobileNetV2);
        assert_eq!(config.genai.resolved_api_key().as_deref(), Some("literal-key"));
        assert!(config.storage.log_detections);
        assert_eq!(config.auth.tokens[0].username, "asha");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution_keeps_unknown_variables() {
        std::env::set_var("RURAL_EDU_TEST_HOST", "10.0.0.7");
        let content = r#"
[server]
host = "${RURAL_EDU_TEST_HOST}"

[search]
api_key = "${RURAL_EDU_TEST_SURELY_UNSET}"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(config.server.host, "10.0.0.7");
        assert_eq!(
            config.search.api_key.as_deref(),
            Some("${RURAL_EDU_TEST_SURELY_UNSET}")
        );
    }

    #[test]
    fn test_templated_key_counts_as_missing() {
        assert_eq!(resolve_key(Some("${RURAL_EDU_TEST_NOPE}"), "RURAL_EDU_TEST_NOPE_ENV"), None);
        assert_eq!(resolve_key(Some("   "), "RURAL_EDU_TEST_NOPE_ENV"), None);
    }

    #[test]
    fn test_key_falls_back_to_environment() {
        std::env::set_var("RURAL_EDU_TEST_FALLBACK_KEY", "from-env");
        assert_eq!(
            resolve_key(None, "RURAL_EDU_TEST_FALLBACK_KEY").as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = TomlConfig::default();
        config.genai.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.model.input_width = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.auth.tokens.push(TokenEntry {
            token: "${MISSING_TOKEN}".to_string(),
            id: 1,
            email: "a@b.c".to_string(),
            username: "a".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigValidation { .. }));
    }
}
