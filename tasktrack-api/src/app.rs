/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_api::{app::AppState, config::Config};
/// use tasktrack_shared::{auth::TokenVerifier, store::FileStore};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = Arc::new(FileStore::open("data.json")?);
/// let state = AppState::new(store, Arc::new(TokenVerifier::LocalDev), config);
/// let app = tasktrack_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tasktrack_shared::auth::TokenVerifier;
use tasktrack_shared::models::{comment::Comment, folder::Folder, page::Page, task::Task};
use tasktrack_shared::store::{Collection, Document, DocumentStore};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning; the store handle is constructed
/// once in `main` and injected here rather than cached globally.
#[derive(Clone)]
pub struct AppState {
    /// Document store backend
    pub store: Arc<dyn DocumentStore>,

    /// Identity provider for bearer tokens
    pub verifier: Arc<TokenVerifier>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<TokenVerifier>, config: Config) -> Self {
        Self {
            store,
            verifier,
            config: Arc::new(config),
        }
    }

    /// Typed handle over one document collection
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(Arc::clone(&self.store))
    }

    pub fn tasks(&self) -> Collection<Task> {
        self.collection()
    }

    pub fn comments(&self) -> Collection<Comment> {
        self.collection()
    }

    pub fn folders(&self) -> Collection<Folder> {
        self.collection()
    }

    pub fn pages(&self) -> Collection<Page> {
        self.collection()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /api/                            # Authenticated JSON API
/// │   ├── GET|POST   /tasks
/// │   ├── GET|PUT|DELETE /tasks/:id
/// │   ├── POST       /tasks/:id/comments
/// │   ├── DELETE     /comments/:id
/// │   ├── GET|POST   /folders
/// │   ├── PUT|DELETE /folders/:id
/// │   ├── GET|POST   /folders/:id/pages
/// │   └── GET|PUT|DELETE /pages/:id
/// └── /*                               # Static files, SPA fallback
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (every /api route)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // JSON API (every route requires a resolved identity)
    let api_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/comments", post(routes::comments::add_comment))
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .route(
            "/folders",
            get(routes::folders::list_folders).post(routes::folders::create_folder),
        )
        .route(
            "/folders/:id",
            put(routes::folders::update_folder).delete(routes::folders::delete_folder),
        )
        .route(
            "/folders/:id/pages",
            get(routes::pages::list_pages).post(routes::pages::create_page),
        )
        .route(
            "/pages/:id",
            get(routes::pages::get_page)
                .put(routes::pages::update_page)
                .delete(routes::pages::delete_page),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    // Static files with SPA fallback: unmatched paths serve index.html so
    // client-side routing works on refresh
    let static_dir = state.config.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .fallback_service(spa)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Authentication middleware layer
///
/// Resolves the caller's identity from the Authorization header through the
/// configured provider and injects the resulting `AuthUser` into request
/// extensions. In local-dev mode this always succeeds with the fixed
/// development identity.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let user = state.verifier.authenticate(authorization.as_deref()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
