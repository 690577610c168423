//! Test-double generation.
//!
//! A double class mirrors a real class's attribute surface while replacing
//! every attribute not declared untouchable with an inert sentinel.

/// Nullify/preserve decisions and the magic-name rule.
pub mod classifier;
/// Serde-backed double configuration.
pub mod config;
/// Double classes and their construction strategy.
pub mod generator;
/// Untouchable / touchable bookkeeping.
pub mod policy;

pub use classifier::{classify, is_magic_name, Disposition};
pub use config::DoubleConfig;
pub use generator::{make_double_type, DoubleClass, DoubleConstruction, Nullification};
pub use policy::{PolicySnapshot, PolicyStore};
