//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the repository boundary trait but are themselves
//! concrete structs, not traits.

mod navigation;

pub use navigation::{Navigation, NavigationService};
