pub mod common;
pub mod env;
pub mod error;
pub mod runner;
pub mod runtime_resolver;
pub mod sandbox_backend;
pub mod workspace;

pub use error::SandboxError;
pub use runner::{EnvMap, ExecutionResult, Invocation, RuntimePaths};
pub use sandbox_backend::{CommandBackend, NativeBackend};
pub use workspace::Sandbox;
