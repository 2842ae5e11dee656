pub mod check;
pub mod outline_ops;
