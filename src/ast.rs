//! The abstract syntax tree produced by the reader. An [Expr] is a tagged
//! variant plus the [LocationRange] it came from; a tree ([Ast]) is an
//! ordered sequence of owned forms.
//!
//! Nodes own their children exclusively and are moved, never copied, into
//! their parents.

use std::fmt::Display;

use itertools::Itertools;

use crate::location::LocationRange;
use crate::namespace::Namespace;

pub type Ast = Vec<Expr>;

#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: LocationRange,
}

#[derive(Debug)]
pub enum ExprKind {
    /// A lisp symbol (not to be confused with ELF symbols). A symbol
    /// without an explicit namespace part belongs to the namespace it was
    /// read in.
    Symbol { ns_name: String, name: String },

    /// A number literal. `value` holds the digits without the sign.
    Number {
        value: String,
        negative: bool,
        float: bool,
    },

    Str(String),

    /// A keyword like `:doc`. The name excludes the leading colon.
    Keyword(String),

    List(Ast),

    /// Errors can live in the tree like any other node, so the analyzer is
    /// free to produce them and let a later stage stop the pipeline.
    Error { tag: String, message: String },

    Namespace(Box<Namespace>),
}

impl Expr {
    pub fn new(kind: ExprKind, location: LocationRange) -> Self {
        Self { kind, location }
    }

    /// Build a symbol out of a raw lexeme. The first `/` splits the lexeme
    /// into a namespace part and a name part; a lexeme without one inherits
    /// `current_ns`.
    pub fn symbol(location: LocationRange, lexeme: &str, current_ns: &str) -> Self {
        let (ns_name, name) = match lexeme.find('/') {
            Some(at) => (lexeme[..at].to_string(), lexeme[at + 1..].to_string()),
            None => (current_ns.to_string(), lexeme.to_string()),
        };

        Self::new(ExprKind::Symbol { ns_name, name }, location)
    }

    pub fn error(location: LocationRange, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Error {
                tag: tag.into(),
                message: message.into(),
            },
            location,
        )
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Symbol { ns_name, name } => write!(f, "{}/{}", ns_name, name),
            ExprKind::Number {
                value, negative, ..
            } => write!(f, "{}{}", if *negative { "-" } else { "" }, value),
            ExprKind::Str(data) => write!(f, "\"{}\"", data),
            ExprKind::Keyword(name) => write!(f, ":{}", name),
            ExprKind::List(elements) => {
                write!(f, "({})", elements.iter().map(|e| e.to_string()).join(" "))
            }
            ExprKind::Error { tag, message } => write!(f, "(error :{} \"{}\")", tag, message),
            ExprKind::Namespace(ns) => write!(f, "<ns {}>", ns.name),
        }
    }
}

/// Print every form of the given tree on its own line.
pub fn dump(ast: &Ast) {
    for form in ast {
        println!("{}", form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_symbols_split_on_the_first_slash() {
        let loc = LocationRange::unknown("user");
        let sym = Expr::symbol(loc, "core/map", "user");

        let ExprKind::Symbol { ns_name, name } = &sym.kind else {
            panic!("expected a symbol");
        };
        assert_eq!(ns_name, "core");
        assert_eq!(name, "map");
    }

    #[test]
    fn plain_symbols_inherit_the_current_namespace() {
        let loc = LocationRange::unknown("user");
        let sym = Expr::symbol(loc, "map", "user");

        let ExprKind::Symbol { ns_name, name } = &sym.kind else {
            panic!("expected a symbol");
        };
        assert_eq!(ns_name, "user");
        assert_eq!(name, "map");
    }

    #[test]
    fn display_is_lisp_shaped() {
        let loc = LocationRange::unknown("user");
        let list = Expr::new(
            ExprKind::List(vec![
                Expr::symbol(loc.clone(), "a", "user"),
                Expr::new(
                    ExprKind::Number {
                        value: "1".into(),
                        negative: true,
                        float: false,
                    },
                    loc.clone(),
                ),
                Expr::new(ExprKind::Keyword("doc".into()), loc.clone()),
            ]),
            loc,
        );

        assert_eq!(list.to_string(), "(user/a -1 :doc)");
    }

    #[test]
    fn error_nodes_render_their_tag_and_message() {
        let loc = LocationRange::unknown("user");
        let err = Expr::error(loc, "unresolved", "no such binding");

        assert_eq!(err.to_string(), "(error :unresolved \"no such binding\")");
    }
}
