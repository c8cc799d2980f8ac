//! Subscriber installation. Silent unless `NSP_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

pub fn init() {
    let Ok(directives) = std::env::var("NSP_LOG") else {
        return;
    };
    let filter = EnvFilter::new(directives);
    tracing_subscriber::registry()
        .with(
            HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
