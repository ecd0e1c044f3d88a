pub mod check_service;
pub mod description_service;
pub mod dto;
pub mod model_cache;
pub mod ports;
pub mod services;
