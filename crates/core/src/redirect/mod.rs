//! Redirect hand-off and return
//!
//! The component sends the shopper to a URL (external app, in-app browser
//! or custom scheme) and waits for the host to report the return URL
//! through the shared [`RedirectListener`].

pub mod component;
pub mod listener;
pub mod ports;

pub use component::RedirectComponent;
pub use listener::{RedirectListener, RegistrationId};
pub use ports::{BrowserComponent, BrowserEvent};
