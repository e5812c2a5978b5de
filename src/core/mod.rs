//! Process-wide plumbing shared by the serve components.

mod lifetime;
mod state;

pub use lifetime::{Canceller, Lifetime, lifetime};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
