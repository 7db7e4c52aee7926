//! The semantic analyzer seam. Analysis rewrites raw forms into their
//! semantic counterparts, e.g. a list starting with `def` into a binding
//! node, resolving names against the namespace's environments on the way.
//! The pass shipped here is a pass-through: it takes the forms and hands
//! them back untouched, but the interface already threads through
//! everything a real pass needs, so extensions can fail with a proper
//! [Error](crate::errors::Error).

use crate::ast::Ast;
use crate::environment::EnvId;
use crate::errors::Result;
use crate::namespace::Namespace;

/// Everything a pass over one namespace gets to see: the namespace itself
/// and the environment new top level bindings go into.
pub struct AnalysisState<'ns> {
    pub ns: &'ns mut Namespace,
    pub env: EnvId,
}

impl<'ns> AnalysisState<'ns> {
    pub fn new(ns: &'ns mut Namespace) -> Self {
        let env = ns.root_env();
        Self { ns, env }
    }
}

/// Analyze `forms` and return the semantically rewritten tree.
pub fn analyze(_state: &mut AnalysisState<'_>, forms: Ast) -> Result<Ast> {
    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind};
    use crate::jit::Jit;
    use crate::location::LocationRange;
    use crate::options::Options;

    #[test]
    fn the_default_pass_returns_the_forms_unchanged() {
        let engine = Jit::new(Options::default());
        let mut ns = Namespace::new(&engine, LocationRange::unknown("user"), "user", None);

        let forms = vec![Expr::new(
            ExprKind::Keyword("doc".into()),
            LocationRange::unknown("user"),
        )];

        let mut state = AnalysisState::new(&mut ns);
        let analyzed = analyze(&mut state, forms).unwrap();

        assert_eq!(analyzed.len(), 1);
        assert!(matches!(analyzed[0].kind, ExprKind::Keyword(ref k) if k == "doc"));
    }
}
