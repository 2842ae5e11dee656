pub mod cli;
pub mod io;
pub mod logging;
pub mod mindmap;
pub mod model;
pub mod ops;
pub mod parse;
