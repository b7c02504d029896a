//! tracing -> browser console.

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

pub(crate) fn init() {
    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // syntect is chatty at debug
    let filter = EnvFilter::new("debug,syntect=warn");

    let reg = Registry::default().with(filter).with(wasm_layer);

    // A second init (hot reload, two bundles) keeps the first subscriber.
    let _ = set_global_default(reg);
}
