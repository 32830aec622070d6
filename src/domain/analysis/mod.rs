//! Analysis results as returned by the backend, the backend contract, and
//! the pure formatting used to present results.

pub mod entities;
pub mod repositories;
pub mod services;

pub use entities::*;
pub use repositories::*;
pub use services::*;
