use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::state::StatePaths;

/// Command line arguments for the neurochat binary.
#[derive(Parser, Clone, Debug)]
#[command(name = "neurochat", version, about = "Personal chatbot backend for Gemini")]
pub struct Args {
    #[arg(long, env = "NEUROCHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, env = "NEUROCHAT_PORT", default_value_t = 5000)]
    pub port: u16,
    /// Directory holding `Main/index.html`, `Main/login.html` and assets.
    #[arg(long, env = "NEUROCHAT_STATIC_ROOT", default_value = ".")]
    pub static_root: PathBuf,
    #[arg(long, env = "NEUROCHAT_MEMORY_FILE", default_value = "Main/memory.json")]
    pub memory_file: PathBuf,
    #[arg(long, env = "NEUROCHAT_PROMPT_FILE", default_value = "Configs/prompt.json")]
    pub prompt_file: PathBuf,
    #[arg(long, env = "NEUROCHAT_CONFIG_FILE", default_value = "Configs/config.json")]
    pub config_file: PathBuf,
    #[arg(long, env = "NEUROCHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
    #[arg(long = "api-base-url", env = "NEUROCHAT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,
    /// Upper bound on a single generation request.
    #[arg(long, env = "NEUROCHAT_REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,
    /// Open the chat page in a browser shortly after startup.
    #[arg(long)]
    pub open_browser: bool,
}

impl Args {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths {
            memory_file: self.memory_file.clone(),
            prompt_file: self.prompt_file.clone(),
            config_file: self.config_file.clone(),
        }
    }
}
