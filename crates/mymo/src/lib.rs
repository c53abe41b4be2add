pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use tracing_subscriber::filter::LevelFilter;

pub fn init(level: LevelFilter) {
    infra::logging::init(level);
}
