use clap::Parser;
use std::sync::Arc;

use mask2former_onnx_server::{
    adapters::{
        catalog::fs_catalog::FsImageCatalog,
        onnx::{loader::OnnxBackendLoader, model_catalog::StaticModelRegistry},
        storage::fs_artifacts::FsArtifactStore,
    },
    application::{
        check_service::InferenceCheckService,
        model_cache::ModelCache,
        services::{CatalogService, PredictionService},
    },
    config::AppConfig,
    domain::check::format_report,
    telemetry,
};

/// Run the segmentation pipeline over the local test images and print a report.
#[derive(Parser, Debug)]
#[command(name = "inference-check", version)]
struct Args {
    /// Optional max number of images to run
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing();

    let cfg = AppConfig::load()?;
    cfg.ensure_dirs()?;

    let prediction = PredictionService::new(
        Arc::new(StaticModelRegistry::with_defaults(&cfg.model_dir)),
        Arc::new(OnnxBackendLoader::new()),
        Arc::new(FsArtifactStore::new(&cfg.result_dir)?),
        Arc::new(ModelCache::new()),
    );
    let catalog = CatalogService::new(Arc::new(FsImageCatalog::new(&cfg.test_image_dir)));

    let runner = InferenceCheckService::new(catalog, Arc::new(prediction), cfg.default_model_key.clone());
    let summary = runner.run(args.limit)?;
    println!("{}", format_report(&summary));

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
