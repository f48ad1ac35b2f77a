use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    classifier::{load_prompt, ClassificationClient, GeminiClient},
    config::AnalyzerConfig,
    normalizer::ResponseNormalizer,
};

/// Error type for AppContext builder
#[derive(Debug)]
pub struct AppContextBuildError(&'static str);

impl std::fmt::Display for AppContextBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing required field: {}", self.0)
    }
}

impl std::error::Error for AppContextBuildError {}

/// Process-wide state shared by every request. Read-only after startup.
#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<dyn ClassificationClient>,
    pub normalizer: Arc<ResponseNormalizer>,
    pub config: AnalyzerConfig,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("model", &self.client.model_name())
            .field("normalizer", &self.normalizer)
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Default)]
pub struct AppContextBuilder {
    client: Option<Arc<dyn ClassificationClient>>,
    normalizer: Option<Arc<ResponseNormalizer>>,
    config: Option<AnalyzerConfig>,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn new(
        client: Arc<dyn ClassificationClient>,
        normalizer: ResponseNormalizer,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            client,
            normalizer: Arc::new(normalizer),
            config,
        }
    }

    /// Create AppContext from config with the Gemini client and default normalizer
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, String> {
        AppContextBuilder::from_config(config)?
            .build()
            .map_err(|e| e.to_string())
    }
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: Arc<dyn ClassificationClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = Some(Arc::new(normalizer));
        self
    }

    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<AppContext, AppContextBuildError> {
        Ok(AppContext {
            client: self.client.ok_or(AppContextBuildError("client"))?,
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Arc::new(ResponseNormalizer::default())),
            config: self.config.ok_or(AppContextBuildError("config"))?,
        })
    }

    /// Initialize every component from config
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, String> {
        Ok(Self::new()
            .with_gemini_client(&config)?
            .normalizer(ResponseNormalizer::new())
            .config(config))
    }

    fn with_gemini_client(self, config: &AnalyzerConfig) -> Result<Self, String> {
        let prompt = load_prompt(config.prompt_file.as_deref()).map_err(|e| e.to_string())?;
        if let Some(path) = &config.prompt_file {
            info!("Loaded prompt override from {}", path.display());
        }

        let client = GeminiClient::new(&config.model, prompt)
            .map_err(|e| format!("Failed to create model client: {}", e))?;
        debug!(endpoint = client.endpoint(), "Created Gemini client");

        Ok(self.client(Arc::new(client)))
    }
}
