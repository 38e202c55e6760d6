//! Scholar gacha logic. Keep this crate free of IO and platform concerns.

pub mod card;
pub mod celebration;
pub mod config;
pub mod draw;
pub mod events;
pub mod filter;
pub mod history;
pub mod particle;
pub mod rng;
pub mod scholar;
pub mod session;
pub mod surface;

pub use card::*;
pub use celebration::*;
pub use config::*;
pub use draw::*;
pub use events::*;
pub use filter::*;
pub use history::*;
pub use particle::*;
pub use rng::*;
pub use scholar::*;
pub use session::*;
pub use surface::*;
