//! The front-end of the Sable programming language: a lisp that parses
//! into namespaces and hands them to a JIT execution engine.
//!
//! The crate is built around three pieces. The [reader] turns a byte
//! buffer into an [ast::Ast] of located forms. The [source::SourceManager]
//! owns every buffer ever read, resolves dotted namespace names against an
//! ordered load path and keeps the namespace-to-buffer index. The
//! [namespace::Namespace] is the unit of compilation: it owns the forms of
//! one source file together with the stack of semantic environments, and
//! its `expand_tree` pushes freshly read forms as far down the pipeline as
//! the configured [options::CompilationPhase] asks for.
//!
//! Lowering and execution live behind the [jit::Jit] handle and are not
//! part of this crate.

pub mod ast;
pub mod cli;
pub mod commands;
pub mod environment;
pub mod errors;
pub mod jit;
pub mod location;
pub mod namespace;
pub mod options;
pub mod reader;
pub mod semantics;
pub mod source;

pub use errors::{Error, ErrorKind, Result};

/// The file extension namespace files carry on disk: namespace `a.b.c`
/// resolves to `<load path>/a/b/c.sbl`.
pub const DEFAULT_SUFFIX: &str = "sbl";
