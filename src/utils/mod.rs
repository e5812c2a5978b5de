//! Shared helpers with no site-level state.

pub mod html;
pub mod mime;
pub mod path;
pub mod text;
