//! # Phishline Main Entry Point
//!
//! Wires logging, argument parsing and the application controller.

use anyhow::Result;
use phishline::cmd_args::CommandLineArgs;
use phishline::AppController;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_subscriber();

    let cmd_args = CommandLineArgs::parse();
    let mut app = AppController::new(cmd_args)?;
    app.run().await
}

/// Log level comes from PHISHLINE_LOG_LEVEL; dependency noise stays at warn.
fn init_tracing_subscriber() {
    let env_var = format!("{}_LOG_LEVEL", env!("CARGO_PKG_NAME").to_uppercase());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_env(env_var)
                .add_directive("reqwest=warn".parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("rustls=warn".parse().unwrap())
                .add_directive("tokio=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
