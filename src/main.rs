use std::path::PathBuf;

use clap::Parser;
use waste_classifier::{
    config::{AnalyzerConfig, ConfigResult, ModelConfig, DEFAULT_API_BASE, DEFAULT_MODEL},
    server::{self, ServerConfig},
};

#[derive(Parser, Debug)]
#[command(name = "waste-classifier")]
#[command(about = "Classify photographed waste as recyclable using a multimodal model")]
#[command(long_about = r#"
Waste Classifier

Accepts an image upload on POST /analyze/, asks the configured Gemini model
whether the pictured object is recyclable, and returns a normalized JSON
classification.

Examples:
  GEMINI_API_KEY=... waste-classifier --port 8000
  waste-classifier --api-key ... --model gemini-1.5-flash --log-json
"#)]
struct CliArgs {
    /// Credential for the model API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8000)]
    port: u16,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Replace the built-in classification prompt with the contents of this file
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 20 * 1024 * 1024)]
    max_payload_size: usize,

    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,

    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Headers checked, in order, for an incoming request id
    #[arg(long, num_args = 0..)]
    request_id_headers: Vec<String>,

    #[arg(long, default_value_t = 10)]
    shutdown_grace_period_secs: u64,
}

impl CliArgs {
    fn to_analyzer_config(&self) -> ConfigResult<AnalyzerConfig> {
        let config = AnalyzerConfig {
            host: self.host.clone(),
            port: self.port,
            max_payload_size: self.max_payload_size,
            model: ModelConfig {
                api_key: self.api_key.clone().unwrap_or_default(),
                model: self.model.clone(),
                api_base: self.api_base.clone(),
                request_timeout_secs: self.request_timeout_secs,
            },
            prompt_file: self.prompt_file.clone(),
            log_dir: self.log_dir.clone(),
            log_level: Some(self.log_level.clone()),
        };
        config.validate()?;
        Ok(config)
    }

    fn to_server_config(&self, analyzer_config: AnalyzerConfig) -> ServerConfig {
        ServerConfig {
            analyzer_config,
            log_json: self.log_json,
            request_id_headers: if self.request_id_headers.is_empty() {
                None
            } else {
                Some(self.request_id_headers.clone())
            },
            shutdown_grace_period_secs: self.shutdown_grace_period_secs,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli_args = CliArgs::parse();

    println!("Waste classifier starting...");
    println!("Host: {}:{}", cli_args.host, cli_args.port);
    println!("Model: {}", cli_args.model);

    let analyzer_config = cli_args.to_analyzer_config()?;
    let server_config = cli_args.to_server_config(analyzer_config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move { server::startup(server_config).await })?;
    Ok(())
}
