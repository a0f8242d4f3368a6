mod campaign;
mod config;
mod constants;
mod error;
mod loot;
mod progress;
mod store;

pub use campaign::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use loot::*;
pub use progress::*;
pub use store::*;
