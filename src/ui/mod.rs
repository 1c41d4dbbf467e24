//! Terminal UI layer for interactive chat sessions.
//!
//! Key submodules include:
//! - [`chat_loop`]: the event loop that feeds key presses into [`chat_app`]
//!   and runs completions off the loop.
//! - [`renderer`] and [`wrap`]: frame layout and pre-wrapped text.
//! - [`theme`] and [`appearance`]: color policy and OS light/dark detection.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the session and its persistence.

pub mod appearance;
pub mod chat_app;
pub mod chat_loop;
pub mod renderer;
pub mod theme;
pub mod view_state;
pub mod wrap;
