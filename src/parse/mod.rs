pub mod clean;
pub mod outline_parser;

pub use clean::{clean_text, decorate_title, status_icon};
pub use outline_parser::{indent, join_lines, line_depth, parse_outline, skeleton, split_lines};
