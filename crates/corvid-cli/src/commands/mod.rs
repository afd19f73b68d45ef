//! Command implementations.

mod build;
mod dev;
mod serve;
mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use serve::execute as serve_execute;
