//! Building blocks for tensor kernel code generators.
//!
//! - [`text`]: an indentation-aware source buffer with deferred
//!   (retractable) lines and splicing.
//! - [`expr`]: symbolic index expressions with fast rendering and
//!   structural substitution.
//! - [`math`]: integer helpers for launch and tile sizing.
//!
//! The two engines are independent; a generator typically renders index
//! expressions and writes the strings into a buffer.

pub mod error;
pub mod expr;
pub mod math;
pub mod text;

pub use error::{ExprError, MathError};
pub use expr::{render, substitute, Expr, FuncName, Symbol, Term};
pub use text::{BufferConfig, DeferredLine, IndentGuard, IndentedBuffer, Line, Retraction};
