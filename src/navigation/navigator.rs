//! Navigator: single-writer handle around the navigation controller.
//!
//! Screens never mutate `NavState` directly. Synchronous taps go through
//! [`Navigator::dispatch`]; async screen actions take a [`Ticket`] before
//! calling a collaborator and hand it back to [`Navigator::complete`], which
//! drops the completion if the user has since moved to another screen.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

use super::controller::{NavState, Transition};
use super::draft::OnboardingDraft;
use super::event::NavEvent;
use super::screen::{OnboardingStep, ScreenId};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Serializable view of the navigation state handed to screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub screen: ScreenId,
    pub onboarding_step: OnboardingStep,
    pub draft: OnboardingDraft,
    /// Bumped every time the active screen changes.
    pub generation: u64,
}

/// Records which screen an async operation was issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub screen: ScreenId,
    generation: u64,
}

struct Inner {
    state: NavState,
    generation: u64,
}

impl Inner {
    fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            screen: self.state.screen,
            onboarding_step: self.state.onboarding_step,
            draft: self.state.draft.clone(),
            generation: self.generation,
        }
    }
}

/// Shared navigation handle. Cheap to clone through `Arc`.
pub struct Navigator {
    inner: RwLock<Inner>,
    tx: broadcast::Sender<NavSnapshot>,
}

impl Navigator {
    /// Create a navigator starting on the welcome screen.
    pub fn new() -> Arc<Self> {
        Self::with_state(NavState::default())
    }

    /// Create a navigator from an existing state, e.g. a returning user
    /// that should land on home.
    pub fn with_state(state: NavState) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            inner: RwLock::new(Inner {
                state,
                generation: 0,
            }),
            tx,
        })
    }

    /// Subscribe to snapshots published after every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<NavSnapshot> {
        self.tx.subscribe()
    }

    pub async fn snapshot(&self) -> NavSnapshot {
        self.inner.read().await.snapshot()
    }

    pub async fn current_screen(&self) -> ScreenId {
        self.inner.read().await.state.screen
    }

    /// Apply a user-triggered event.
    pub async fn dispatch(&self, event: NavEvent) -> Transition {
        let mut inner = self.inner.write().await;
        self.apply_locked(&mut inner, event)
    }

    /// Issue a ticket for an async action started on `screen`.
    ///
    /// Returns `None` when `screen` is not the active screen, in which case
    /// the caller should not start the action at all.
    pub async fn begin(&self, screen: ScreenId) -> Option<Ticket> {
        let inner = self.inner.read().await;
        if inner.state.screen != screen {
            debug!(requested = %screen, current = %inner.state.screen, "Refusing ticket for inactive screen");
            return None;
        }
        Some(Ticket {
            screen,
            generation: inner.generation,
        })
    }

    /// Whether a ticket still refers to the active screen.
    pub async fn is_current(&self, ticket: &Ticket) -> bool {
        let inner = self.inner.read().await;
        inner.generation == ticket.generation && inner.state.screen == ticket.screen
    }

    /// Apply the completion event of an async action, unless the screen it
    /// was issued against is no longer current.
    pub async fn complete(&self, ticket: Ticket, event: NavEvent) -> Transition {
        let mut inner = self.inner.write().await;
        if inner.generation != ticket.generation || inner.state.screen != ticket.screen {
            info!(
                issued_on = %ticket.screen,
                current = %inner.state.screen,
                event = event.name(),
                "Suppressing stale completion"
            );
            return Transition::Stale {
                issued_on: ticket.screen,
                current: inner.state.screen,
            };
        }
        self.apply_locked(&mut inner, event)
    }

    fn apply_locked(&self, inner: &mut Inner, event: NavEvent) -> Transition {
        let before = inner.state.clone();
        let transition = inner.state.apply(event);

        if let Transition::Applied { from, to } = &transition {
            if from != to {
                inner.generation += 1;
                info!(
                    from = %from,
                    to = %to,
                    step = %inner.state.onboarding_step,
                    generation = inner.generation,
                    "Screen transition"
                );
            }
            if inner.state != before {
                // Ok if no subscribers are listening yet
                let _ = self.tx.send(inner.snapshot());
            }
        }

        transition
    }
}
