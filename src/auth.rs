//! Token models and validated identifiers.

pub mod id;
pub mod pair;
pub mod secret;

pub use id::*;
pub use pair::*;
pub use secret::*;
