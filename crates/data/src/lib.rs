//! Dataset loading, validation and maintenance tooling.

pub mod audit;
pub mod import;
pub mod load;

pub use audit::*;
pub use import::*;
pub use load::*;

pub use gacha_core::{GachaConfig, Rarity, ScholarRecord};
