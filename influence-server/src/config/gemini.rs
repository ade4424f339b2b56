use confique::Config;

/// Configuration for the Gemini text-generation service
#[derive(Debug, Config, Clone)]
pub struct GeminiConfig {
    /// Google AI API key
    #[config(env = "GOOGLE_API_KEY")]
    pub api_key: String,

    /// Base URL of the Generative Language API
    /// (default: https://generativelanguage.googleapis.com)
    #[config(
        env = "GEMINI_BASE_URL",
        default = "https://generativelanguage.googleapis.com"
    )]
    pub base_url: String,

    /// Model used for post generation (default: gemini-1.5-flash-latest)
    #[config(env = "GEMINI_MODEL", default = "gemini-1.5-flash-latest")]
    pub model: String,

    /// Timeout for a single completion in seconds (default: 30)
    #[config(env = "GEMINI_TIMEOUT", default = 30)]
    pub timeout: u64,
}

impl GeminiConfig {
    /// Returns the generateContent URL for the configured model
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let config = GeminiConfig {
            api_key: "key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            timeout: 30,
        };
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }
}
