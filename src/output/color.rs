//! Colored terminal output

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{TreeOutput, connector};

/// Writes tree lines to a color-capable stream.
///
/// Connectors and decorations are written plain so the text matches
/// `TextOutput` once colors are stripped.
pub struct ColorOutput<W: WriteColor> {
    out: W,
}

impl ColorOutput<StandardStream> {
    /// Colored output on stdout.
    pub fn stdout(use_color: bool) -> Self {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> ColorOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_colored(&mut self, text: &str, spec: &ColorSpec) -> io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }
}

fn dir_spec() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Blue)).set_bold(true);
    spec
}

impl<W: WriteColor> TreeOutput for ColorOutput<W> {
    fn output_root(&mut self, marker: &str, name: &str) -> io::Result<()> {
        write!(self.out, "{}", marker)?;
        self.write_colored(name, &dir_spec())?;
        writeln!(self.out)
    }

    fn output_node(
        &mut self,
        name: &str,
        decoration: &str,
        is_dir: bool,
        is_last: bool,
        prefix: &str,
    ) -> io::Result<()> {
        write!(self.out, "{}{}{}", prefix, connector(is_last), decoration)?;
        if is_dir {
            self.write_colored(name, &dir_spec())?;
        } else {
            write!(self.out, "{}", name)?;
        }
        writeln!(self.out)
    }

    fn output_error(&mut self, message: &str, is_last: bool, prefix: &str) -> io::Result<()> {
        write!(self.out, "{}{}", prefix, connector(is_last))?;
        self.write_colored(message, ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(self.out)
    }

    fn finish(&mut self, _dir_count: usize, _file_count: usize) -> io::Result<()> {
        self.out.flush()
    }
}
