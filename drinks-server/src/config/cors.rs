use confique::Config;

/// Cross-origin resource sharing configuration
#[derive(Debug, Config, Clone)]
pub struct CorsConfig {
    /// Allowed origins, comma-separated; "*" allows any origin (default: "*")
    #[config(env = "DRINKS_CORS_ALLOWED_ORIGINS", default = "*")]
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Get allowed origins as a vector
    pub fn get_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.get_allowed_origins().iter().any(|origin| origin == "*")
    }
}
