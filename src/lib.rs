//! jtv - virtualized viewer for huge JSON documents.
//!
//! The engine turns a parsed document into a flat sequence of line
//! descriptors ([`sequencer`]), loads them in cooperative batches
//! ([`loader`]), mounts only the visible window ([`viewport`]), and bounds
//! live content with two recycled pages ([`pager`]). [`session`] wires those
//! together behind a host trait; [`view`] is the terminal host.
//!
//! The core is headless and unit-agnostic: hosts decide what a "pixel" is
//! (the TUI uses one terminal row) and how lines are materialized.

pub mod config;
pub mod loader;
pub mod logging;
pub mod model;
pub mod pager;
pub mod parser;
pub mod render;
pub mod sequencer;
pub mod session;
pub mod view;
pub mod viewport;
