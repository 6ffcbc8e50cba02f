//! Indentation-aware source text assembly.
//!
//! [`IndentedBuffer`] collects generated lines, prefixing each with the
//! current indentation. Lines may be [`DeferredLine`]s, resolved (or
//! dropped) only when the buffer is rendered. Buffers and raw snippets can
//! be spliced into one another; their own indentation is normalized away
//! and the receiving buffer's is applied.

mod config;
mod dedent;
mod deferred;


use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

pub use config::BufferConfig;
pub use deferred::{ConditionalLine, DeferredLine, RetractableLine, Retraction};

use dedent::{dedent_block, leading_width, skip_chars};

/// Spaces per indentation level unless configured otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 4;

// ─── Lines ─────────────────────────────────────────────────────────

/// One stored line.
#[derive(Debug)]
pub enum Line {
    /// Final text, indentation included.
    Literal(String),
    Deferred(Box<dyn DeferredLine>),
}

impl Line {
    /// The text currently held, before any deferred resolution.
    pub fn text(&self) -> &str {
        match self {
            Line::Literal(text) => text,
            Line::Deferred(line) => line.line(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Line::Deferred(_))
    }

    fn resolve(&self) -> Option<Cow<'_, str>> {
        match self {
            Line::Literal(text) => Some(Cow::Borrowed(text.as_str())),
            Line::Deferred(line) => match line.resolve() {
                Some(text) => Some(Cow::Owned(text)),
                None => {
                    tracing::trace!(line = line.line(), "deferred line retracted");
                    None
                }
            },
        }
    }
}

impl Clone for Line {
    fn clone(&self) -> Self {
        match self {
            Line::Literal(text) => Line::Literal(text.clone()),
            Line::Deferred(line) => Line::Deferred(line.with_line(line.line().to_string())),
        }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::Literal(text.to_string())
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::Literal(text)
    }
}

impl From<&String> for Line {
    fn from(text: &String) -> Self {
        Line::Literal(text.clone())
    }
}

impl From<Box<dyn DeferredLine>> for Line {
    fn from(line: Box<dyn DeferredLine>) -> Self {
        Line::Deferred(line)
    }
}

impl From<RetractableLine> for Line {
    fn from(line: RetractableLine) -> Self {
        Line::Deferred(Box::new(line))
    }
}

impl From<ConditionalLine> for Line {
    fn from(line: ConditionalLine) -> Self {
        Line::Deferred(Box::new(line))
    }
}

/// What [`IndentedBuffer::splice`] accepts.
#[derive(Clone, Copy, Debug)]
pub enum Snippet<'a> {
    Buffer(&'a IndentedBuffer),
    Text(&'a str),
}

impl<'a> From<&'a IndentedBuffer> for Snippet<'a> {
    fn from(buffer: &'a IndentedBuffer) -> Self {
        Snippet::Buffer(buffer)
    }
}

impl<'a> From<&'a str> for Snippet<'a> {
    fn from(text: &'a str) -> Self {
        Snippet::Text(text)
    }
}

impl<'a> From<&'a String> for Snippet<'a> {
    fn from(text: &'a String) -> Self {
        Snippet::Text(text)
    }
}

// ─── Buffer ────────────────────────────────────────────────────────

/// Accumulates generated source lines with indentation tracking.
///
/// Not meant to be shared between generation tasks: deferred lines hold
/// `Rc` state, so a buffer stays on the thread that built it.
#[derive(Clone, Debug)]
pub struct IndentedBuffer {
    lines: Vec<Line>,
    indent: isize,
    tab_width: usize,
}

impl Default for IndentedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentedBuffer {
    pub fn new() -> Self {
        Self::with_indent(0)
    }

    pub fn with_indent(initial_indent: isize) -> Self {
        Self {
            lines: Vec::new(),
            indent: initial_indent,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    pub fn with_config(config: &BufferConfig) -> Self {
        Self {
            lines: Vec::new(),
            indent: config.initial_indent,
            tab_width: config.tab_width,
        }
    }

    pub fn depth(&self) -> isize {
        self.indent
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Whitespace for the current depth. Negative depths get none.
    pub fn prefix(&self) -> String {
        let depth = usize::try_from(self.indent).unwrap_or(0);
        " ".repeat(depth * self.tab_width)
    }

    /// Append one line at the current indentation.
    ///
    /// Deferred lines get the prefix baked into their payload. Blank or
    /// whitespace-only literals are stored empty, never indented.
    pub fn write_line(&mut self, line: impl Into<Line>) {
        let line = match line.into() {
            Line::Deferred(deferred) => Line::Deferred(deferred.with_prefix(&self.prefix())),
            Line::Literal(text) if text.trim().is_empty() => Line::Literal(String::new()),
            Line::Literal(text) => Line::Literal(format!("{}{}", self.prefix(), text)),
        };
        self.lines.push(line);
    }

    pub fn write_lines<L: Into<Line>>(&mut self, lines: impl IntoIterator<Item = L>) {
        for line in lines {
            self.write_line(line);
        }
    }

    /// Deepen indentation by `offset` until the returned guard drops.
    ///
    /// The guard derefs to the buffer, so writes go through it:
    ///
    /// ```
    /// use lowerkit::text::IndentedBuffer;
    ///
    /// let mut buf = IndentedBuffer::new();
    /// buf.write_line("for i in range(n):");
    /// {
    ///     let mut body = buf.indent(1);
    ///     body.write_line("acc += x[i]");
    /// }
    /// buf.write_line("return acc");
    /// assert_eq!(buf.render(), "for i in range(n):\n    acc += x[i]\nreturn acc\n");
    /// ```
    pub fn indent(&mut self, offset: isize) -> IndentGuard<'_> {
        self.indent += offset;
        IndentGuard {
            buffer: self,
            offset,
        }
    }

    /// Run `f` one scope deeper; indentation is restored even if `f` panics.
    pub fn indented<R>(&mut self, offset: isize, f: impl FnOnce(&mut IndentedBuffer) -> R) -> R {
        let mut guard = self.indent(offset);
        f(&mut guard)
    }

    /// Merge another buffer or a raw text block into this one.
    ///
    /// A buffer loses the smallest leading-whitespace width found on its
    /// non-empty literal lines (deferred lines already carry their final
    /// indentation and are not measured), then every line is re-written
    /// here. Text is dedented as a block, left-stripped when `strip` is
    /// set, dropped when empty, right-stripped and written line by line.
    pub fn splice<'a>(&mut self, snippet: impl Into<Snippet<'a>>, strip: bool) {
        match snippet.into() {
            Snippet::Buffer(other) => self.splice_buffer(other),
            Snippet::Text(text) => self.splice_text(text, strip),
        }
    }

    fn splice_buffer(&mut self, other: &IndentedBuffer) {
        let dedent = other
            .lines
            .iter()
            .filter_map(|line| match line {
                Line::Literal(text) if !text.is_empty() => Some(leading_width(text)),
                _ => None,
            })
            .min()
            .unwrap_or(0);
        tracing::trace!(dedent, lines = other.lines.len(), "splicing buffer");
        for line in &other.lines {
            match line {
                Line::Literal(text) => self.write_line(skip_chars(text, dedent)),
                Line::Deferred(deferred) => self.write_line(deferred.skip_chars(dedent)),
            }
        }
    }

    fn splice_text(&mut self, text: &str, strip: bool) {
        let dedented = dedent_block(text);
        let block = if strip {
            dedented.trim_start()
        } else {
            dedented.as_str()
        };
        if block.is_empty() {
            return;
        }
        for line in block.trim_end().split('\n') {
            self.write_line(line);
        }
    }

    fn resolved_lines(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.lines.iter().filter_map(Line::resolve)
    }

    /// Render every surviving line, each terminated by `\n`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Like [`render`](Self::render), but a line ending in `\` loses the
    /// backslash and its newline, joining it to the next line.
    pub fn render_raw(&self) -> String {
        let mut out = String::new();
        for text in self.resolved_lines() {
            match text.strip_suffix('\\') {
                Some(continued) => out.push_str(continued),
                None => {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Drop all lines. Depth is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// True iff no line has been written, whatever rendering would yield.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stored lines, deferred ones included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}

impl fmt::Display for IndentedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for text in self.resolved_lines() {
            f.write_str(&text)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}

// ─── Indentation scope ─────────────────────────────────────────────

/// Restores the buffer's depth when dropped, including during unwinding.
#[must_use = "indentation is undone as soon as the guard is dropped"]
pub struct IndentGuard<'a> {
    buffer: &'a mut IndentedBuffer,
    offset: isize,
}

impl Deref for IndentGuard<'_> {
    type Target = IndentedBuffer;

    fn deref(&self) -> &IndentedBuffer {
        self.buffer
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut IndentedBuffer {
        self.buffer
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.buffer.indent -= self.offset;
    }
}
