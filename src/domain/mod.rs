//! Pure domain layer: no browser APIs, no I/O.

pub mod analysis;
pub mod assets;
pub mod errors;
pub mod logging;
