pub mod loader;
pub mod mask2former_engine;
pub mod model_catalog;
