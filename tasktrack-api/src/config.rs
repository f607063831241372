/// Configuration management for the API server
///
/// Configuration comes from environment variables (a `.env` file is loaded
/// in development) into a type-safe struct built once at startup.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DATABASE_URL`: Postgres connection string; when absent the server
///   falls back to local JSON-file storage
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATA_FILE`: Path of the JSON fallback file (default: data.json)
/// - `STATIC_DIR`: Directory of the built SPA (default: public)
/// - `ENTRA_TENANT_ID` + `ENTRA_CLIENT_ID`: Enable Microsoft Entra ID auth
/// - `GOOGLE_CLIENT_ID`: Enable Google OAuth auth
///
/// The two identity providers are mutually exclusive; configuring both is
/// a startup error. Configuring neither selects the fixed local-development
/// identity.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```
use std::env;
use std::path::PathBuf;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage backend selection
    pub storage: StorageConfig,

    /// Identity provider selection
    pub auth: AuthConfig,

    /// Directory served as the SPA, with index.html fallback
    pub static_dir: PathBuf,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive (development)
    pub cors_origins: Vec<String>,
}

/// Storage backend selection
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Managed Postgres document store
    Postgres {
        /// Connection URL
        url: String,

        /// Maximum pooled connections
        max_connections: u32,
    },

    /// Local JSON-file fallback for development
    File {
        /// Path of the data file
        path: PathBuf,
    },
}

/// Identity provider selection
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Microsoft Entra ID: JWKS + RS256 JWT validation
    Entra { tenant_id: String, client_id: String },

    /// Google OAuth: userinfo lookup per request. The client id itself is
    /// only consumed by the SPA's sign-in flow; its presence selects the
    /// mode here.
    Google,

    /// No provider: fixed local-development identity
    LocalDev,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an invalid value or both identity
    /// providers are configured at once.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let storage = resolve_storage(
            env::var("DATABASE_URL").ok(),
            max_connections,
            env::var("DATA_FILE").unwrap_or_else(|_| "data.json".to_string()),
        );

        let auth = resolve_auth(
            env::var("ENTRA_TENANT_ID").ok(),
            env::var("ENTRA_CLIENT_ID").ok(),
            env::var("GOOGLE_CLIENT_ID").ok(),
        )?;

        let static_dir =
            PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()));

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            storage,
            auth,
            static_dir,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn resolve_storage(
    database_url: Option<String>,
    max_connections: u32,
    data_file: String,
) -> StorageConfig {
    match database_url {
        Some(url) if !url.is_empty() => StorageConfig::Postgres {
            url,
            max_connections,
        },
        _ => StorageConfig::File {
            path: PathBuf::from(data_file),
        },
    }
}

fn resolve_auth(
    entra_tenant_id: Option<String>,
    entra_client_id: Option<String>,
    google_client_id: Option<String>,
) -> anyhow::Result<AuthConfig> {
    let entra = entra_tenant_id.zip(entra_client_id);

    match (entra, google_client_id) {
        (Some(_), Some(_)) => anyhow::bail!(
            "ENTRA_TENANT_ID/ENTRA_CLIENT_ID and GOOGLE_CLIENT_ID are mutually exclusive"
        ),
        (Some((tenant_id, client_id)), None) => Ok(AuthConfig::Entra {
            tenant_id,
            client_id,
        }),
        (None, Some(_)) => Ok(AuthConfig::Google),
        (None, None) => Ok(AuthConfig::LocalDev),
    }
}
