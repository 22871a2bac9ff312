//! Tree line output
//!
//! The renderer hands every line it produces to a `TreeOutput`. Two sinks are
//! provided:
//!
//! - `TextOutput` - accumulates the canonical plain-text tree in memory
//! - `ColorOutput` - writes the same lines to a terminal with colors

mod color;
mod text;

use std::io;

pub use color::ColorOutput;
pub use text::TextOutput;

pub const BRANCH: &str = "├───";
pub const CORNER: &str = "└───";
pub const PIPE: &str = "│   ";
pub const BLANK: &str = "    ";

/// Callback for tree output - receives each line as it is produced.
pub trait TreeOutput {
    /// The first line: the root's marker followed by its name.
    fn output_root(&mut self, marker: &str, name: &str) -> io::Result<()>;

    /// One admitted entry. `decoration` sits between the connector and the
    /// name (the folder marker for directories, padding for files).
    fn output_node(
        &mut self,
        name: &str,
        decoration: &str,
        is_dir: bool,
        is_last: bool,
        prefix: &str,
    ) -> io::Result<()>;

    /// A directory that could not be listed, reported in place of its children.
    fn output_error(&mut self, message: &str, is_last: bool, prefix: &str) -> io::Result<()>;

    fn finish(&mut self, _dir_count: usize, _file_count: usize) -> io::Result<()> {
        Ok(())
    }
}

/// Connector drawn before an entry.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { CORNER } else { BRANCH }
}

/// Prefix for the children of an entry.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}{}", prefix, BLANK)
    } else {
        format!("{}{}", prefix, PIPE)
    }
}
