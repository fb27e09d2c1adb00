use crate::config::toml_config::TomlConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "rural-edu-backend")]
#[command(about = "Backend service for the rural-education platform")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "RURAL_EDU_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override [server].host")]
    pub host: Option<String>,

    #[arg(long, short = 'p', help = "Override [server].port")]
    pub port: Option<u16>,

    #[arg(long, help = "Override [model].model_path")]
    pub model_path: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Command-line values win over the file.
    pub fn apply(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model_path) = &self.model_path {
            config.model.model_path = model_path.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
    }
}
