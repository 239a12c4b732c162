//! # Top-Up Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository and gateway adapters
//! - Create the top-up service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topup_gateway::{GatewayClient, GatewayConfig};
use topup_hex::{ServiceConfig, TopUpService, inbound::HttpServer};
use topup_repo::build_repo;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("topup-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,topup_app=debug,topup_hex=debug,topup_gateway=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting top-up server on port {}", config.port);
    tracing::info!("Gateway: {}", config.gateway.base_url);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Gateway adapter serves both as provider and as live supplier catalog
    let gateway_config = GatewayConfig::new(
        config.gateway.base_url,
        config.gateway.api_key,
        config.gateway.username,
        config.gateway.password,
    )
    .with_timeout(config.gateway.timeout);
    let provider = GatewayClient::new(gateway_config.clone())?;
    let catalog = Arc::new(GatewayClient::new(gateway_config)?);

    // Create the top-up service
    let service = TopUpService::new(repo, provider)
        .with_catalog(catalog)
        .with_config(ServiceConfig {
            provider_timeout: config.gateway.timeout,
        });

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
