pub mod config_io;
pub mod outline_store;
