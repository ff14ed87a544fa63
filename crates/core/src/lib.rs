//! # Payflow Core
//!
//! Payment action state machines - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the 3DS2 SDK, the host platform
//!   and the backend fingerprint endpoint
//! - The retry scheduler contract
//! - The redirect listener and redirect component
//! - The 3DS2 core, classic and compact handlers and `ThreeDS2Component`
//!
//! ## Architecture Principles
//! - Only depends on `payflow-domain`
//! - No HTTP or platform code
//! - All external collaborators via traits

pub mod component;
pub mod redirect;
pub mod scheduling;
pub mod threeds2;

// Re-export specific items to avoid ambiguity
pub use component::{ActionComponentDelegate, ActionComponentKind, Completion};
pub use redirect::ports::{AppLauncher, ApplicationStateProvider, PresentationDelegate};
pub use redirect::{BrowserComponent, RedirectComponent, RedirectListener};
pub use scheduling::{ScheduledWork, Scheduler};
pub use threeds2::ports::{FingerprintSubmitter, ThreeDSService, ThreeDSTransaction};
pub use threeds2::{
    ThreeDS2ActionHandler, ThreeDS2ClassicActionHandler, ThreeDS2CompactActionHandler,
    ThreeDS2Component, ThreeDS2CoreActionHandler,
};
