pub mod ability;
pub mod base_monster;
pub mod template;

pub use ability::*;
pub use base_monster::*;
pub use template::*;
