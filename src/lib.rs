pub mod config;
pub mod drop_game;
pub mod error;
pub mod http;
pub mod memefi;

pub use error::{BotError, ConfigError, GameReply};

/// Install the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
