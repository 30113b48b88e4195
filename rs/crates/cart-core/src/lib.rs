//! cart-core — observable cart state, list views, UI actions and the
//! controller that ties them to a [`cart_api::CartBackend`].
//!
//! Typical wiring: create a [`Controller`], attach a [`Screen`] so every
//! state change repaints the page regions, call [`Controller::bootstrap`],
//! then feed [`UiAction`]s from the page into [`Controller::dispatch`].

pub mod action;
pub mod controller;
pub mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use action::{ActionError, ActionPayload, UiAction};
pub use controller::{Controller, ControllerOptions};
pub use state::{State, SubscriptionId};
pub use view::{render_body, render_cart, render_inventory, render_notice, Screen, SharedScreen};
