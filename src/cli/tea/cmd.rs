//! Commands for side effects in the Elm Architecture
//!
//! Commands are returned from `update()` and run by the [`Program`](super::Program).
//! Bridge calls are the only asynchronous side effect: the program runs them
//! on a task and turns the result back into a message with `on_done`.

use std::fmt;

use serde_json::Value;

use crate::bridge::{BridgeCommand, BridgeError};

/// Turns a bridge result into a message
pub type Completion<M> = Box<dyn FnOnce(Result<Value, BridgeError>) -> M + Send>;

/// A pending bridge call
pub struct Invocation<M> {
    pub command: BridgeCommand,
    pub on_done: Completion<M>,
}

/// A Command represents a side effect to execute
pub enum Cmd<M> {
    /// No operation - return this when there's no side effect
    None,

    /// Send a message back to the model
    Msg(M),

    /// Execute multiple commands in sequence
    Batch(Vec<Cmd<M>>),

    /// Call the backend through the command bridge
    Invoke(Invocation<M>),

    /// Show an info notice
    Info(String),

    /// Show a success notice
    Success(String),

    /// Show a warning notice
    Warning(String),

    /// Show an error notice
    Error(String),
}

impl<M> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Cmd::None"),
            Self::Msg(_) => write!(f, "Cmd::Msg(...)"),
            Self::Batch(batch) => f.debug_tuple("Batch").field(&batch.len()).finish(),
            Self::Invoke(inv) => f.debug_tuple("Invoke").field(&inv.command).finish(),
            Self::Info(s) => f.debug_tuple("Info").field(s).finish(),
            Self::Success(s) => f.debug_tuple("Success").field(s).finish(),
            Self::Warning(s) => f.debug_tuple("Warning").field(s).finish(),
            Self::Error(s) => f.debug_tuple("Error").field(s).finish(),
        }
    }
}

impl<M: 'static> Cmd<M> {
    /// Create a no-op command
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Create a message command
    #[must_use]
    pub fn msg(msg: M) -> Self {
        Self::Msg(msg)
    }

    /// Batch multiple commands together, dropping no-ops
    #[must_use]
    pub fn batch(cmds: impl IntoIterator<Item = Self>) -> Self {
        let cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            _ => Self::Batch(cmds),
        }
    }

    /// Call the backend and map the outcome to a message
    #[must_use]
    pub fn invoke<F>(command: BridgeCommand, on_done: F) -> Self
    where
        F: FnOnce(Result<Value, BridgeError>) -> M + Send + 'static,
    {
        Self::Invoke(Invocation {
            command,
            on_done: Box::new(on_done),
        })
    }

    #[must_use]
    pub fn info(s: impl Into<String>) -> Self {
        Self::Info(s.into())
    }

    #[must_use]
    pub fn success(s: impl Into<String>) -> Self {
        Self::Success(s.into())
    }

    #[must_use]
    pub fn warning(s: impl Into<String>) -> Self {
        Self::Warning(s.into())
    }

    #[must_use]
    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    /// Lift a child page's command into the parent's message type
    #[must_use]
    pub fn map<N, F>(self, f: F) -> Cmd<N>
    where
        N: 'static,
        F: Fn(M) -> N + Clone + Send + 'static,
    {
        match self {
            Self::None => Cmd::None,
            Self::Msg(msg) => Cmd::Msg(f(msg)),
            Self::Batch(cmds) => Cmd::Batch(cmds.into_iter().map(|c| c.map(f.clone())).collect()),
            Self::Invoke(Invocation { command, on_done }) => Cmd::Invoke(Invocation {
                command,
                on_done: Box::new(move |result| f(on_done(result))),
            }),
            Self::Info(s) => Cmd::Info(s),
            Self::Success(s) => Cmd::Success(s),
            Self::Warning(s) => Cmd::Warning(s),
            Self::Error(s) => Cmd::Error(s),
        }
    }

    /// Bridge commands this command would issue, in order
    #[must_use]
    pub fn invocations(&self) -> Vec<&BridgeCommand> {
        match self {
            Self::Invoke(inv) => vec![&inv.command],
            Self::Batch(cmds) => cmds.iter().flat_map(Self::invocations).collect(),
            _ => Vec::new(),
        }
    }
}

/// Convert a message directly to a command
impl<M> From<M> for Cmd<M> {
    fn from(msg: M) -> Self {
        Self::Msg(msg)
    }
}
