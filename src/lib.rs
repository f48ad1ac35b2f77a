pub mod app_context;
pub mod classifier;
pub mod config;
pub mod middleware;
pub mod multimodal;
pub mod normalizer;
pub mod observability;
pub mod protocols;
pub mod routers;
pub mod server;
