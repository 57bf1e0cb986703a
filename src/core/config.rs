use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub prompts: PromptConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Admin session settings. Passwords are optional: a role whose password is
/// unset simply cannot log in.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub admin_password: Option<String>,
    pub superadmin_password: Option<String>,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<set>"))
            .field(
                "superadmin_password",
                &self.superadmin_password.as_ref().map(|_| "<set>"),
            )
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Chat Completions providers (OpenAI and x.ai Grok)
#[derive(Clone)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_vision_model: String,
    pub grok_api_key: Option<String>,
    pub grok_base_url: String,
    pub grok_model: String,
    pub request_timeout: Duration,
    /// Fail closed on malformed model output instead of returning fallback objects
    pub strict_parsing: bool,
    /// Number of trailing chat messages forwarded to the model
    pub chat_history_limit: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_vision_model", &self.openai_vision_model)
            .field("grok_api_key", &self.grok_api_key.as_ref().map(|_| "<set>"))
            .field("grok_base_url", &self.grok_base_url)
            .field("grok_model", &self.grok_model)
            .field("request_timeout", &self.request_timeout)
            .field("strict_parsing", &self.strict_parsing)
            .field("chat_history_limit", &self.chat_history_limit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// JSON file consulted when a template is missing from the database
    pub template_file: String,
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            prompts: PromptConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB, room for data URL images

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_TTL_SECS: u64 = 8 * 3600; // one working day
    const MIN_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("AUTH_JWT_SECRET")
            .map_err(|_| "AUTH_JWT_SECRET environment variable is required".to_string())?;

        if jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "AUTH_JWT_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());
        let superadmin_password = env::var("SUPERADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());

        let token_ttl_secs = env::var("AUTH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "AUTH_TOKEN_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            admin_password,
            superadmin_password,
            token_ttl: Duration::from_secs(token_ttl_secs),
        })
    }
}

impl LlmConfig {
    const DEFAULT_OPENAI_BASE_URL: &'static str = "https://api.openai.com/v1";
    const DEFAULT_GROK_BASE_URL: &'static str = "https://api.x.ai/v1";
    const DEFAULT_OPENAI_MODEL: &'static str = "gpt-4o-mini";
    const DEFAULT_OPENAI_VISION_MODEL: &'static str = "gpt-4o";
    const DEFAULT_GROK_MODEL: &'static str = "grok-3-mini";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;
    const DEFAULT_CHAT_HISTORY_LIMIT: usize = 10;

    pub fn from_env() -> Result<Self, String> {
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty());

        // x.ai documents XAI_API_KEY; GROK_API_KEY takes precedence when both are set
        let grok_api_key = env::var("GROK_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| env::var("XAI_API_KEY").ok().filter(|s| !s.is_empty()));

        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let grok_base_url = env::var("GROK_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_GROK_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| Self::DEFAULT_OPENAI_MODEL.to_string());
        let openai_vision_model = env::var("OPENAI_VISION_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_OPENAI_VISION_MODEL.to_string());
        let grok_model =
            env::var("GROK_MODEL").unwrap_or_else(|_| Self::DEFAULT_GROK_MODEL.to_string());

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "LLM_TIMEOUT_SECS must be a valid number".to_string())?;

        let strict_parsing = env::var("LLM_STRICT_PARSING")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let chat_history_limit = env::var("CHAT_HISTORY_LIMIT")
            .unwrap_or_else(|_| Self::DEFAULT_CHAT_HISTORY_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| "CHAT_HISTORY_LIMIT must be a valid number".to_string())?;

        Ok(Self {
            openai_api_key,
            openai_base_url,
            openai_model,
            openai_vision_model,
            grok_api_key,
            grok_base_url,
            grok_model,
            request_timeout: Duration::from_secs(timeout_secs),
            strict_parsing,
            chat_history_limit,
        })
    }
}

impl PromptConfig {
    const DEFAULT_TEMPLATE_FILE: &'static str = "templates/prompts.json";
    const DEFAULT_CACHE_TTL_SECS: u64 = 300; // 5 minutes

    pub fn from_env() -> Result<Self, String> {
        let template_file = env::var("PROMPT_TEMPLATE_FILE")
            .unwrap_or_else(|_| Self::DEFAULT_TEMPLATE_FILE.to_string());

        let cache_ttl_secs = env::var("PROMPT_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "PROMPT_CACHE_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            template_file,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "ElevateAI API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for ElevateAI".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("docs".to_string()),
            password: None,
            title: "t".to_string(),
            version: "v".to_string(),
            description: "d".to_string(),
        };
        assert!(swagger.credentials().is_none());

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("docs:secret".to_string()));
    }

    #[test]
    fn test_server_address() {
        let app = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 1024,
        };
        assert_eq!(app.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_auth_config_debug_redacts_secrets() {
        let auth = AuthConfig {
            jwt_secret: "a".repeat(40),
            admin_password: Some("hunter2".to_string()),
            superadmin_password: None,
            token_ttl: Duration::from_secs(60),
        };
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains(&"a".repeat(40)));
    }
}
