//! hookbox configuration layer.
//!
//! All environment reads live here; the rest of the workspace goes through
//! the typed structs instead of calling `std::env::var` directly.
//!
//! - `loader`: `.env` loading plus `env_or` / `env_optional` / `env_bool`
//! - `schema`: `ObservabilityConfig`, `RunnerConfig`
//! - `env_keys`: variable names and their aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv, load_dotenv_from_dir};
pub use schema::{ObservabilityConfig, RunnerConfig};
