//! Tracing subscriber setup.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_tree::HierarchicalLayer;

/// Map `-v`/`-q` counts onto a level. Zero of both is `INFO`.
pub fn level_for(verbose: u8, quiet: u8) -> LevelFilter {
    let rank = 2i16 + i16::from(verbose) - i16::from(quiet);
    match rank {
        i16::MIN..=-1 => LevelFilter::OFF,
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Repeated calls are ignored.
pub fn init(level: LevelFilter) {
    let tree = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_targets(false)
        .with_bracketed_fields(true);

    let _ = tracing_subscriber::registry()
        .with(level)
        .with(tree)
        .try_init();
}
