// Infrastructure module: configuration files, logging, rendering, server

pub mod config;
pub mod logging;
pub mod render;
#[cfg(feature = "server")]
pub mod server;

pub use config::{load_config, ConfigError};
pub use logging::init_logging;
pub use render::{ColorPalette, RenderError, Renderer, SvgRenderer, TextRenderer};
#[cfg(feature = "server")]
pub use server::{start_server, ServerConfig};
