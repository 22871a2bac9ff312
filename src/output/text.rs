//! Plain-text tree output

use std::io;

use super::{TreeOutput, connector};

/// Buffers the tree as plain text, one `\n`-terminated line per node.
#[derive(Debug, Default)]
pub struct TextOutput {
    buffer: String,
}

impl TextOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl TreeOutput for TextOutput {
    fn output_root(&mut self, marker: &str, name: &str) -> io::Result<()> {
        self.buffer.push_str(marker);
        self.buffer.push_str(name);
        self.buffer.push('\n');
        Ok(())
    }

    fn output_node(
        &mut self,
        name: &str,
        decoration: &str,
        _is_dir: bool,
        is_last: bool,
        prefix: &str,
    ) -> io::Result<()> {
        self.buffer.push_str(prefix);
        self.buffer.push_str(connector(is_last));
        self.buffer.push_str(decoration);
        self.buffer.push_str(name);
        self.buffer.push('\n');
        Ok(())
    }

    fn output_error(&mut self, message: &str, is_last: bool, prefix: &str) -> io::Result<()> {
        self.output_node(message, "", false, is_last, prefix)
    }
}
