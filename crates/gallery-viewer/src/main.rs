//! Gallery Viewer - desktop entry point

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use gallery_core::{load_config, Viewer};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "gallery-viewer")]
    #[command(about = "Walk through a glTF gallery in first person")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "gallery.toml")]
        config: PathBuf,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// glTF model to load instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Gallery viewer v{}", env!("CARGO_PKG_VERSION"));

        let mut config = load_config(&args.config)
            .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

        if let Some(model) = args.model {
            config.model.path = model;
        }

        info!(
            model = %config.model.path,
            images = config.frames.image_urls.len(),
            "Configuration loaded"
        );

        let viewer = Viewer::new(config).context("invalid gallery configuration")?;
        gallery_viewer::run(viewer);

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts from the library's wasm_bindgen entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
