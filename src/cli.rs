//! The command line surface of the `sable` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::options::CompilationPhase;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use verbose output.
    #[arg(short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sable's C compiler interface.
    Cc {
        /// Arguments handed to the external C compiler untouched.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Compile and run a Sable file.
    Run {
        /// The source file to run.
        file: PathBuf,

        /// Extra directories appended to the namespace load path.
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// Stop the pipeline after the given phase.
        #[arg(long, value_enum, default_value_t = CompilationPhase::NoOptimization)]
        phase: CompilationPhase,
    },
}
