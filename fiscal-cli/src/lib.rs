//! Command-line front end for the Spanish legal-structure tax simulator.

pub mod app;
pub mod logging;
pub mod render;
pub mod utils;
