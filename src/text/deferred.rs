//! Lines whose presence is decided when the buffer is rendered.
//!
//! A generator often has to reserve a line (a declaration, a load) before it
//! knows whether anything will use it. It writes a deferred line instead
//! and flips the decision later; the buffer asks at render time.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::dedent::skip_chars;

/// A buffer line that may be retracted after it was written.
///
/// Implementors provide the payload, the resolution, and a way to rebuild
/// the line around a new payload with the same retraction condition. The
/// buffer uses the latter to bake in indentation and to dedent spliced
/// lines.
pub trait DeferredLine: fmt::Debug {
    /// The current payload. Truthiness checks use this, never the
    /// resolution.
    fn line(&self) -> &str;

    /// The final text, or `None` if the line has been retracted.
    fn resolve(&self) -> Option<String>;

    /// Same condition, new payload.
    fn with_line(&self, line: String) -> Box<dyn DeferredLine>;

    fn with_prefix(&self, prefix: &str) -> Box<dyn DeferredLine> {
        self.with_line(format!("{}{}", prefix, self.line()))
    }

    fn trim_start(&self) -> Box<dyn DeferredLine> {
        self.with_line(self.line().trim_start().to_string())
    }

    /// Drop the first `n` characters of the payload.
    fn skip_chars(&self, n: usize) -> Box<dyn DeferredLine> {
        self.with_line(skip_chars(self.line(), n).to_string())
    }

    fn is_empty(&self) -> bool {
        self.line().is_empty()
    }

    fn len(&self) -> usize {
        self.line().len()
    }
}

/// Whitespace-only payloads become empty, so blank deferred lines are never
/// indented.
fn normalize(line: String) -> String {
    if line.trim().is_empty() {
        String::new()
    } else {
        line
    }
}

// ─── Retraction handles ────────────────────────────────────────────

/// Shared switch that retracts every line created from it, including
/// copies the buffer derives when indenting or splicing.
#[derive(Clone, Debug, Default)]
pub struct Retraction(Rc<Cell<bool>>);

impl Retraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retract(&self) {
        self.0.set(true);
    }

    pub fn is_retracted(&self) -> bool {
        self.0.get()
    }

    /// A line controlled by this handle.
    pub fn line(&self, line: impl Into<String>) -> RetractableLine {
        RetractableLine {
            line: normalize(line.into()),
            retraction: self.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RetractableLine {
    line: String,
    retraction: Retraction,
}

impl DeferredLine for RetractableLine {
    fn line(&self) -> &str {
        &self.line
    }

    fn resolve(&self) -> Option<String> {
        if self.retraction.is_retracted() {
            None
        } else {
            Some(self.line.clone())
        }
    }

    fn with_line(&self, line: String) -> Box<dyn DeferredLine> {
        Box::new(self.retraction.line(line))
    }
}

// ─── Predicate lines ───────────────────────────────────────────────

/// A line kept iff its predicate holds at render time.
#[derive(Clone)]
pub struct ConditionalLine {
    line: String,
    keep: Rc<dyn Fn() -> bool>,
}

impl ConditionalLine {
    pub fn new(line: impl Into<String>, keep: impl Fn() -> bool + 'static) -> Self {
        Self {
            line: normalize(line.into()),
            keep: Rc::new(keep),
        }
    }
}

impl fmt::Debug for ConditionalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalLine")
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

impl DeferredLine for ConditionalLine {
    fn line(&self) -> &str {
        &self.line
    }

    fn resolve(&self) -> Option<String> {
        if (self.keep)() {
            Some(self.line.clone())
        } else {
            None
        }
    }

    fn with_line(&self, line: String) -> Box<dyn DeferredLine> {
        Box::new(ConditionalLine {
            line: normalize(line),
            keep: Rc::clone(&self.keep),
        })
    }
}
