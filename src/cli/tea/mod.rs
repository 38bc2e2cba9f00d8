//! Elm Architecture for the langvm frontend
//!
//! Pages are [`Model`]s: they receive messages, change their own state, and
//! return a [`Cmd`] describing side effects. The [`Program`] owns the model and
//! the command bridge; it runs `Cmd::Invoke` on tokio tasks and delivers each
//! result back to the model as a message on the event loop.
//!
//! ```text
//!   key / mount ──▶ update(msg) ──▶ Cmd::Invoke ──▶ bridge task
//!                      ▲                                 │
//!                      └────── on_done(result) ◀─────────┘
//! ```

mod cmd;
mod renderer;

pub use cmd::{Cmd, Completion, Invocation};
pub use renderer::Renderer;

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bridge::CommandBridge;

/// The core Model trait
pub trait Model {
    /// The message type for this model
    type Msg: Send + fmt::Debug + 'static;

    /// Command to run when the model is first shown
    #[must_use]
    fn init(&self) -> Cmd<Self::Msg> {
        Cmd::none()
    }

    /// Update the model in response to a message
    #[must_use]
    fn update(&mut self, msg: Self::Msg) -> Cmd<Self::Msg>;

    /// Render the model as plain text
    fn view(&self) -> String;
}

/// Severity of a notice produced by `Cmd::Info` and friends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-off message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Runs a model against a command bridge
pub struct Program<M: Model> {
    model: M,
    bridge: Arc<dyn CommandBridge>,
    tx: mpsc::UnboundedSender<M::Msg>,
    rx: mpsc::UnboundedReceiver<M::Msg>,
    in_flight: usize,
    notices: Vec<Notice>,
}

impl<M: Model> Program<M> {
    #[must_use]
    pub fn new(model: M, bridge: Arc<dyn CommandBridge>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            model,
            bridge,
            tx,
            rx,
            in_flight: 0,
            notices: Vec::new(),
        }
    }

    /// Run the model's `init` command
    pub fn start(&mut self) {
        let cmd = self.model.init();
        self.process(cmd);
    }

    /// Deliver a message (user input, route change) to the model
    pub fn send(&mut self, msg: M::Msg) {
        let cmd = self.model.update(msg);
        self.process(cmd);
    }

    /// Execute a command
    pub fn process(&mut self, cmd: Cmd<M::Msg>) {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(msg) => self.send(msg),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process(cmd);
                }
            }
            Cmd::Invoke(Invocation { command, on_done }) => {
                let bridge = Arc::clone(&self.bridge);
                let tx = self.tx.clone();
                self.in_flight += 1;
                tracing::debug!("invoke {} {}", command.name(), command.params());

                tokio::spawn(async move {
                    let result = bridge.invoke(command.name(), command.params()).await;
                    if let Err(e) = &result {
                        tracing::debug!("{} failed: {e}", command.name());
                    }
                    // the receiver lives as long as the program
                    let _ = tx.send(on_done(result));
                });
            }
            Cmd::Info(text) => self.notify(NoticeLevel::Info, text),
            Cmd::Success(text) => self.notify(NoticeLevel::Success, text),
            Cmd::Warning(text) => self.notify(NoticeLevel::Warning, text),
            Cmd::Error(text) => self.notify(NoticeLevel::Error, text),
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        self.notices.push(Notice { level, text });
    }

    fn complete(&mut self, msg: M::Msg) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.send(msg);
    }

    /// Wait for one bridge call to finish and apply it
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(msg) => {
                self.complete(msg);
                true
            }
            None => false,
        }
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.complete(msg);
            applied += 1;
        }
        applied
    }

    /// Process completions until no bridge call is outstanding
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Stop the program and hand back the model
    #[must_use]
    pub fn into_model(self) -> M {
        self.model
    }

    #[must_use]
    pub fn bridge(&self) -> &Arc<dyn CommandBridge> {
        &self.bridge
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
