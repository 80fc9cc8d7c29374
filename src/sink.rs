use std::io::{self, Write};

use regex::Regex;

/// Matches SGR escape sequences: `ESC [ ... m`
const ANSI_PATTERN: &str = "\x1b\\[[0-9;]*m";

/// A write conduit for rendered output.
///
/// The renderer always emits ANSI color; when the sink is constructed with
/// `color = false` every written chunk has its escape sequences stripped
/// before reaching the underlying writer. One orchestrator writes, one
/// downstream consumer (usually stdout) reads.
pub struct OutputSink<W: Write> {
    inner: W,
    color: bool,
    ansi: Regex,
}

impl<W: Write> OutputSink<W> {
    pub fn new(inner: W, color: bool) -> Self {
        OutputSink {
            inner,
            color,
            // The pattern is a constant, so compilation cannot fail
            ansi: Regex::new(ANSI_PATTERN).unwrap(),
        }
    }

    /// Write a chunk, stripping ANSI escapes when color is off.
    pub fn write(&mut self, chunk: &str) -> io::Result<()> {
        if self.color {
            self.inner.write_all(chunk.as_bytes())
        } else {
            let stripped = self.ansi.replace_all(chunk, "");
            self.inner.write_all(stripped.as_bytes())
        }
    }

    /// Write a chunk followed by a newline.
    pub fn puts(&mut self, chunk: &str) -> io::Result<()> {
        self.write(chunk)?;
        self.write("\n")
    }

    /// Signal end of stream: flush everything written so far.
    pub fn end(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[test]
fn test_strips_ansi_when_color_off() {
    let mut sink = OutputSink::new(Vec::new(), false);
    sink.puts("\x1b[33mhello\x1b[0m").unwrap();
    assert_eq!(sink.get_ref(), b"hello\n");
}

#[test]
fn test_passes_through_when_color_on() {
    let mut sink = OutputSink::new(Vec::new(), true);
    sink.write("\x1b[33mhello\x1b[0m").unwrap();
    assert_eq!(sink.get_ref(), b"\x1b[33mhello\x1b[0m");
}
