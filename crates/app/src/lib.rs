//! Screen controllers for the BharatBit client.
//!
//! Each screen is a plain struct holding its view state (drafts, loaded data,
//! banner, current tab or step) with async handlers that call the backend and
//! return the next [`Route`] when the screen navigates away.

pub mod display;
pub mod route;
pub mod screens;
pub mod state;

pub use route::{home_route, initial_route, Banner, Route};
pub use state::AppState;

#[cfg(test)]
pub(crate) mod testing;
