//! Safe SQL builder: identifiers from resource definitions only, values as parameters.

mod builder;
pub use builder::*;
