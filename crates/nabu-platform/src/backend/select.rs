//! Backend selection with fallback on missing client libraries.

use thiserror::Error;

use super::{Backend, BackendKind};
use crate::env::{BACKEND_VAR, EnvError, EnvSource};
use crate::error::BackendError;
use crate::event::CoreHandle;
use crate::native::Connector;
use crate::options::WindowAttributes;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The override names no known backend. Not recoverable.
    #[error("NABU_BACKEND={0:?} does not name a backend (expected x11 or wayland)")]
    UnknownBackend(String),

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Resolves the backend to try first.
pub fn desired_backend(env: &dyn EnvSource) -> Result<BackendKind, SelectError> {
    match env.var(BACKEND_VAR)? {
        None => Ok(BackendKind::DEFAULT),
        Some(value) => {
            BackendKind::from_name(&value).ok_or(SelectError::UnknownBackend(value))
        }
    }
}

/// Progress of one selection run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SelectionState {
    Unselected,
    /// Trying `backend`; `fallback` marks the second and last attempt.
    Selecting { backend: BackendKind, fallback: bool },
    Initialized(BackendKind),
    Failed,
}

impl SelectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SelectionState::Initialized(_) | SelectionState::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: SelectionState) -> bool {
        use SelectionState::*;

        match (self, next) {
            (Unselected, Selecting { fallback, .. }) => !fallback,
            (
                Selecting { backend: a, fallback: false },
                Selecting { backend: b, fallback: true },
            ) => a != b,
            (Selecting { backend, .. }, Initialized(b)) => backend == b,
            (Selecting { .. }, Failed) => true,
            _ => false,
        }
    }
}

/// Result of a successful selection.
#[derive(Debug)]
pub struct Selection {
    pub backend: Backend,
    pub requested: BackendKind,
    /// States visited, starting at `Unselected`.
    pub trace: Vec<SelectionState>,
}

impl Selection {
    pub fn fell_back(&self) -> bool {
        self.backend.kind() != self.requested
    }
}

struct Machine {
    trace: Vec<SelectionState>,
}

impl Machine {
    fn new() -> Self {
        Self {
            trace: vec![SelectionState::Unselected],
        }
    }

    fn state(&self) -> SelectionState {
        self.trace[self.trace.len() - 1]
    }

    fn advance(&mut self, next: SelectionState) {
        debug_assert!(
            self.state().can_advance_to(next),
            "illegal selection transition {:?} -> {next:?}",
            self.state()
        );
        log::trace!("backend selection: {:?} -> {next:?}", self.state());
        self.trace.push(next);
    }
}

/// Initializes `desired`, falling back to the other backend only when the
/// desired backend's client library is missing.
///
/// At most two backends are tried. Errors other than a missing library, and
/// any error from the fallback, are returned unchanged.
pub fn select_and_init(
    desired: BackendKind,
    connector: &mut dyn Connector,
    core: CoreHandle,
    attrs: &WindowAttributes,
) -> Result<Selection, BackendError> {
    let mut machine = Machine::new();
    machine.advance(SelectionState::Selecting {
        backend: desired,
        fallback: false,
    });

    let backend = match Backend::init(desired, connector, core.clone(), attrs) {
        Ok(backend) => backend,
        Err(err @ BackendError::LibraryNotFound { .. }) => {
            let fallback = desired.fallback();
            log::warn!("{err}; falling back to {fallback}");
            machine.advance(SelectionState::Selecting {
                backend: fallback,
                fallback: true,
            });

            match Backend::init(fallback, connector, core, attrs) {
                Ok(backend) => backend,
                Err(err) => {
                    machine.advance(SelectionState::Failed);
                    return Err(err);
                }
            }
        }
        Err(err) => {
            machine.advance(SelectionState::Failed);
            return Err(err);
        }
    };

    machine.advance(SelectionState::Initialized(backend.kind()));
    debug_assert!(machine.state().is_terminal());

    Ok(Selection {
        backend,
        requested: desired,
        trace: machine.trace,
    })
}
