pub mod config;
pub mod event;
pub mod outline;

pub use config::*;
pub use event::*;
pub use outline::*;
