//! Task file enumeration

mod pattern;

pub use pattern::{compile_patterns, enumerate, relative_to};
pub(crate) use pattern::strip_cur_dir;
