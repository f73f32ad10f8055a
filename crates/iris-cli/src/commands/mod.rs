//! Command implementations.

mod serve;
mod train;

pub use serve::ServeCommand;
pub use train::TrainCommand;
