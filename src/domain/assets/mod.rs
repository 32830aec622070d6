//! Asset catalog aggregate: categories, identifiers, selection state and the
//! display/technical symbol mapping.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
