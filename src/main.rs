mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::adcritic::{routes as adcritic_routes, AdCriticService};
use crate::features::auth;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::brandchat::{
    routes as brandchat_routes, BrandChatService, DbPersonaCatalog, PersonaPromptBuilder,
};
use crate::features::brands::{routes as brands_routes, BrandService};
use crate::features::demographics::{routes as demographics_routes, DemographicService};
use crate::features::legal_rules::{routes as legal_rules_routes, LegalRuleService};
use crate::features::legallens::{
    routes as legallens_routes, LegalLensService, PgLegalHistoryStore,
};
use crate::features::prompts::{routes as prompts_routes, PromptService};
use crate::features::seed::{routes as seed_routes, SeedService};
use crate::features::sentiment::{routes as sentiment_routes, SentimentService};
use crate::modules::llm::{ChatCompletion, LlmGateway, LlmProvider};
use crate::shared::prompts::{
    FallbackTemplateStore, InMemoryTemplateStore, PromptComposer, TemplateStore,
};
use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl,
    ));
    let auth_service = Arc::new(
        AuthService::new(&config.auth, Arc::clone(&jwt_validator))
            .map_err(|e| anyhow::anyhow!("Failed to initialize auth: {}", e))?,
    );
    tracing::info!(
        "Auth initialized (session ttl {}s)",
        config.auth.token_ttl.as_secs()
    );

    // Initialize LLM gateway (shared HTTP client for OpenAI and Grok)
    let llm_gateway = Arc::new(
        LlmGateway::new(&config.llm)
            .map_err(|e| anyhow::anyhow!("Failed to initialize LLM gateway: {}", e))?,
    );
    for provider in LlmProvider::ALL {
        if !llm_gateway.is_configured(provider) {
            tracing::warn!("{} API key not set; requests to it will fail", provider);
        }
    }
    let llm: Arc<dyn ChatCompletion> = llm_gateway;
    tracing::info!(
        "LLM gateway initialized (strict parsing: {})",
        config.llm.strict_parsing
    );

    // Catalog services
    let brand_service = Arc::new(BrandService::new(pool.clone()));
    let demographic_service = Arc::new(DemographicService::new(pool.clone()));
    let legal_rule_service = Arc::new(LegalRuleService::new(pool.clone()));
    tracing::info!("Catalog services initialized");

    // Prompt templates: database first, bundled file as fallback
    let prompt_service = Arc::new(PromptService::new(
        pool.clone(),
        config.prompts.cache_ttl,
    ));
    let file_templates = Arc::new(
        InMemoryTemplateStore::from_file(&config.prompts.template_file)
            .map_err(|e| anyhow::anyhow!("Failed to load prompt templates: {}", e))?,
    );
    let template_store: Arc<dyn TemplateStore> = Arc::new(FallbackTemplateStore::new(
        Arc::clone(&prompt_service) as Arc<dyn TemplateStore>,
        file_templates,
    ));
    let composer = Arc::new(PromptComposer::new(template_store));
    let persona_catalog = Arc::new(DbPersonaCatalog::new(
        Arc::clone(&demographic_service),
        Arc::clone(&brand_service),
    ));
    let persona_prompts = Arc::new(PersonaPromptBuilder::new(persona_catalog, composer));
    tracing::info!(
        "Prompt composer initialized (cache ttl {}s)",
        config.prompts.cache_ttl.as_secs()
    );

    // Module services
    let brandchat_service = Arc::new(BrandChatService::new(
        Arc::clone(&persona_prompts),
        Arc::clone(&llm),
        config.llm.chat_history_limit,
    ));
    let adcritic_service = Arc::new(AdCriticService::new(
        pool.clone(),
        Arc::clone(&brand_service),
        Arc::clone(&llm),
        config.llm.openai_vision_model.clone(),
        config.llm.strict_parsing,
    ));
    let legallens_service = Arc::new(LegalLensService::new(
        Arc::clone(&legal_rule_service),
        Arc::new(PgLegalHistoryStore::new(pool.clone())),
        Arc::clone(&llm),
        config.llm.strict_parsing,
    ));
    let sentiment_service = Arc::new(SentimentService::new(Arc::clone(&llm)));
    let seed_service = Arc::new(SeedService::new(pool.clone(), Arc::clone(&prompt_service)));
    tracing::info!("BrandChat, AdCritic, LegalLens and sentiment services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(axum::middleware::from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a session token; role checked per handler)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(brands_routes::admin_routes(Arc::clone(&brand_service)))
        .merge(demographics_routes::admin_routes(Arc::clone(
            &demographic_service,
        )))
        .merge(legal_rules_routes::admin_routes(Arc::clone(
            &legal_rule_service,
        )))
        .merge(prompts_routes::admin_routes(
            Arc::clone(&prompt_service),
            Arc::clone(&persona_prompts),
        ))
        .merge(adcritic_routes::admin_routes(Arc::clone(&adcritic_service)))
        .merge(legallens_routes::admin_routes(Arc::clone(
            &legallens_service,
        )))
        .merge(seed_routes::admin_routes(seed_service))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(brandchat_routes::routes(brandchat_service))
        .merge(adcritic_routes::public_routes(adcritic_service))
        .merge(legallens_routes::public_routes(legallens_service))
        .merge(sentiment_routes::routes(sentiment_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        // Data URL images make ad analysis bodies larger than axum's 2MB default
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
