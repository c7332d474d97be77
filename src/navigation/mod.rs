//! Navigation: the screen-flow state machine that drives onboarding and the
//! primary tabs.
//!
//! Screens are leaf collaborators: they receive a [`NavSnapshot`] and report
//! back with a [`NavEvent`]. The [`controller`] decides what that event means;
//! the [`Navigator`] is the single writer that serializes events and drops
//! stale async completions.

pub mod controller;
pub mod draft;
pub mod event;
pub mod navigator;
pub mod routes;
pub mod screen;
pub mod view;

pub use controller::{NavState, Transition};
pub use draft::OnboardingDraft;
pub use event::NavEvent;
pub use navigator::{NavSnapshot, Navigator, Ticket};
pub use routes::navigation_routes;
pub use screen::{OnboardingStep, ScreenId, Tab};
pub use view::{Progress, ScreenView};
