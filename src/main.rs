use std::sync::Arc;

use mask2former_onnx_server::{
    adapters::{
        catalog::fs_catalog::FsImageCatalog,
        http::{router, state::HttpState},
        onnx::{loader::OnnxBackendLoader, model_catalog::StaticModelRegistry},
        storage::fs_artifacts::FsArtifactStore,
    },
    application::{
        description_service::GeminiDescriptionService,
        model_cache::ModelCache,
        services::{CatalogService, PredictionService},
    },
    config::AppConfig,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG, info by default)
    telemetry::init_tracing();

    let cfg = AppConfig::load()?;
    cfg.ensure_dirs()?;

    tracing::info!("Initialising adapters...");

    // 2. Infrastructure adapters, shared between services and the HTTP layer.
    let registry = Arc::new(StaticModelRegistry::with_defaults(&cfg.model_dir));
    let loader = Arc::new(OnnxBackendLoader::new());
    let artifacts = Arc::new(FsArtifactStore::new(&cfg.result_dir)?);
    let catalog = Arc::new(FsImageCatalog::new(&cfg.test_image_dir));
    let description = Arc::new(GeminiDescriptionService::from_env());

    // 3. Use cases
    let prediction = Arc::new(PredictionService::new(
        registry.clone(),
        loader,
        artifacts,
        Arc::new(ModelCache::new()),
    ));
    let catalog_service = Arc::new(CatalogService::new(catalog));

    // 4. HTTP state
    let state = HttpState {
        predictor: prediction,
        models: registry,
        catalog: catalog_service,
        description,
        default_model_key: cfg.default_model_key.clone(),
    };

    // 5. Router + static files
    let app = router(state, &cfg.static_dir);

    // 6. Serve
    let addr = cfg.bind_addr();
    tracing::info!("Segmentation server listening on http://{}", addr);
    tracing::info!("Static files served from {}", cfg.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
