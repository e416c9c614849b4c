pub mod ability;
pub mod card;
pub mod dice;
pub mod effect;
pub mod element;
pub mod level;
pub mod re;

pub use ability::*;
pub use card::*;
pub use dice::*;
pub use effect::*;
pub use element::*;
pub use level::*;
