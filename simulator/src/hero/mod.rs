pub mod base_hero;
pub mod effects;
pub mod fate;
pub mod health;
pub mod template;

pub use base_hero::*;
pub use effects::*;
pub use fate::*;
pub use health::*;
pub use template::*;
