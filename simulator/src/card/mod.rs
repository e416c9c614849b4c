pub mod base_card;
pub mod id;
pub mod template;

pub use base_card::*;
pub use id::*;
pub use template::*;
