use tracing_subscriber::EnvFilter;

use cubeviz::ViewerConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn,naga=warn")),
        )
        .init();

    if let Err(err) = cubeviz::run(ViewerConfig::default()) {
        log::error!("{err}");
        std::process::exit(-1);
    }
}
