pub mod card;
pub mod combat_event;
pub mod config;
pub mod deck;
pub mod dice;
pub mod encounter;
pub mod error;
pub mod exchange;
pub mod gauntlet;
pub mod harness;
pub mod hero;
pub mod monster;
pub mod report;
pub mod statics;
pub mod template;
pub mod wave;

pub use card::*;
pub use combat_event::*;
pub use config::*;
pub use deck::*;
pub use dice::{DiceOutcome, RollModifiers};
pub use encounter::*;
pub use error::*;
pub use exchange::*;
pub use gauntlet::*;
pub use harness::*;
pub use hero::*;
pub use monster::*;
pub use report::*;
pub use statics::*;
pub use template::*;
pub use wave::*;
