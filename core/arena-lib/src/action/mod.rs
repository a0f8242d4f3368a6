//! action/mod.rs：
//! - action 子模組入口，re-export movement、attack、algo。
//! - 不放具體邏輯。
mod algo;
mod attack;
mod movement;

pub use algo::*;
pub use attack::*;
pub use movement::*;
