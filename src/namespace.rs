//! The namespace is the unit of compilation: an owning container for the
//! forms read out of one source file plus the stack of semantic
//! environments the analyzer scopes names in. Namespaces are mutable over
//! their whole lifetime; a REPL keeps feeding new forms into one.

use tracing::debug;

use crate::ast::{Ast, Expr, ExprKind};
use crate::environment::{EnvId, Environments};
use crate::errors::Result;
use crate::jit::Jit;
use crate::location::LocationRange;
use crate::options::CompilationPhase;
use crate::semantics;

#[derive(Debug)]
pub struct Namespace {
    pub name: String,
    pub filename: Option<String>,

    /// Where the `import` that brought this namespace in occurred, or an
    /// unknown location for roots.
    location: LocationRange,

    tree: Ast,
    environments: Environments<Expr>,
    phase: CompilationPhase,
}

impl Namespace {
    /// Create a namespace. The engine handle is only consulted for the
    /// configured compilation phase; it is not retained.
    pub fn new(
        engine: &Jit,
        location: LocationRange,
        name: impl Into<String>,
        filename: Option<String>,
    ) -> Self {
        let mut environments = Environments::new();
        environments.create(None);

        Self {
            name: name.into(),
            filename,
            location,
            tree: Ast::new(),
            environments,
            phase: engine.options().compilation_phase,
        }
    }

    /// Push a new environment chained to `parent`. The namespace owns it;
    /// the returned id stays valid until the namespace is dropped.
    pub fn create_env(&mut self, parent: Option<EnvId>) -> EnvId {
        self.environments.create(parent)
    }

    /// The top level environment of the namespace.
    pub fn root_env(&self) -> EnvId {
        self.environments.root().expect("root env is not created!")
    }

    pub fn environments(&self) -> &Environments<Expr> {
        &self.environments
    }

    pub fn environments_mut(&mut self) -> &mut Environments<Expr> {
        &mut self.environments
    }

    /// Bind `name` in the root environment. Defining a name that already
    /// exists is legal and overwrites the previous binding, which is
    /// returned.
    pub fn define(&mut self, name: impl Into<String>, node: Expr) -> Option<Expr> {
        let root = self.root_env();
        self.environments.insert(root, name, node)
    }

    /// Look `name` up starting at `env` and walking outwards.
    pub fn lookup(&self, env: EnvId, name: &str) -> Option<&Expr> {
        self.environments.lookup(env, name)
    }

    /// Move the forms of `ast` into the namespace's tree, leaving `ast`
    /// empty. For any phase beyond `Parse` the semantic analyzer runs over
    /// the forms first.
    pub fn expand_tree(&mut self, ast: &mut Ast) -> Result<()> {
        let forms = std::mem::take(ast);

        if self.phase == CompilationPhase::Parse {
            self.tree.extend(forms);
            return Ok(());
        }

        let forms = {
            let mut state = semantics::AnalysisState::new(self);
            semantics::analyze(&mut state, forms)?
        };

        self.tree.extend(forms);
        Ok(())
    }

    /// The forms accumulated so far.
    pub fn tree(&self) -> &Ast {
        &self.tree
    }

    pub fn location(&self) -> &LocationRange {
        &self.location
    }

    /// Wrap the namespace into an AST node carrying its import location.
    pub fn into_expr(self) -> Expr {
        let location = self.location.clone();
        Expr::new(ExprKind::Namespace(Box::new(self)), location)
    }
}

impl Drop for Namespace {
    fn drop(&mut self) {
        debug!("destructing ns: {}", self.name);
    }
}
