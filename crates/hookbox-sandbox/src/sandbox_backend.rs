//! CommandBackend trait: the seam between the lint engine and real processes.
//!
//! The lint orchestrator only ever talks to a `CommandBackend`, so tests can
//! substitute a recording backend and alternative runners (containers,
//! remote hosts) can be slotted in without touching the engine.

use tracing::Span;

use crate::error::SandboxError;
use crate::runner::{execute_process, ExecutionResult, Invocation};

/// Extension point for command execution backends.
pub trait CommandBackend: Send + Sync {
    /// Backend name for logging and diagnostics.
    fn name(&self) -> &str;

    /// Run one invocation to completion. A nonzero exit is `Ok`.
    fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError>;
}

/// Runs invocations as local child processes.
#[derive(Debug, Clone)]
pub struct NativeBackend {
    span: Span,
}

impl NativeBackend {
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new(Span::none())
    }
}

impl CommandBackend for NativeBackend {
    fn name(&self) -> &str {
        "native"
    }

    fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
        let _entered = self.span.enter();
        execute_process(invocation)
    }
}

impl<B: CommandBackend + ?Sized> CommandBackend for &B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
        (**self).execute(invocation)
    }
}

impl<B: CommandBackend + ?Sized> CommandBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
        (**self).execute(invocation)
    }
}
