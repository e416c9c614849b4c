#![allow(unused)]

pub mod sim;
pub mod templates;

pub use sim::*;
pub use templates::*;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
