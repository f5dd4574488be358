pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod interface;
pub mod state;
pub mod storage;

pub use app::build_router;
