//! Compiler configuration. Anything a user can tweak about the compiler
//! ends up in [Options], regardless of the subsystem that consumes it.

use clap::ValueEnum;

/// The operational phases of the compiler, in pipeline order. Anything
/// below `NoOptimization` is only of interest for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum CompilationPhase {
    Parse,
    Analysis,
    /// The high-level Sable IR dialect.
    Slir,
    /// SLIR lowered into other dialects.
    Mlir,
    /// Lowered to the LLVM IR dialect.
    Lir,
    /// Lowered to LLVM IR itself.
    Ir,
    NoOptimization,
    O1,
    O2,
    O3,
}

impl std::fmt::Display for CompilationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().expect("no skipped phases");
        write!(f, "{}", value.get_name())
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub verbose: bool,

    /// Whether to colorize diagnostic output.
    pub with_colors: bool,

    pub jit_enable_object_cache: bool,
    pub jit_enable_gdb_notification_listener: bool,
    pub jit_enable_perf_notification_listener: bool,

    /// Selects the lazy JIT compiler over the eager one.
    pub jit_lazy: bool,

    /// The triple to generate code for. Equal to `host_triple` unless we
    /// are cross compiling.
    pub target_triple: String,

    /// The triple code that runs at compile time is generated for.
    pub host_triple: String,

    /// How far down the pipeline newly expanded forms should be pushed.
    pub compilation_phase: CompilationPhase,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbose: false,
            with_colors: true,
            jit_enable_object_cache: true,
            jit_enable_gdb_notification_listener: true,
            jit_enable_perf_notification_listener: true,
            jit_lazy: false,
            target_triple: String::new(),
            host_triple: String::new(),
            compilation_phase: CompilationPhase::NoOptimization,
        }
    }
}
