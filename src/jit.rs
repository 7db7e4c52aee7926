//! The handle of the execution engine as the front-end sees it. The engine
//! itself (object code generation, the ORC layers) lives downstream; the
//! front-end only consults [Jit::options] and hands namespaces over. The
//! handle still owns the bookkeeping the engine needs: a per-namespace
//! stack of dynamic libraries, the object cache and the counters used to
//! name anonymous functions and namespaces.

use std::sync::atomic::{AtomicU32, Ordering};

use fxhash::FxHashMap;
use tracing::debug;

use crate::errors::{Error, ErrorKind, Result};
use crate::location::LocationRange;
use crate::options::Options;

#[derive(Debug, Default)]
pub struct Jit {
    options: Options,

    /// Compiled objects keyed by module name. Only populated when
    /// `jit_enable_object_cache` is set.
    object_cache: FxHashMap<String, Vec<u8>>,

    /// For every namespace the stack of libraries loaded for it, the newest
    /// last. Reloading a namespace pushes, it never replaces.
    dylibs: FxHashMap<String, Vec<String>>,

    /// Anonymous functions need a unique name each; this counter hands the
    /// names out.
    fn_counter: AtomicU32,

    /// Namespaces get a numeric id at creation time since indexing them by
    /// name would be inefficient.
    ns_counter: AtomicU32,
}

impl Jit {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The most recently loaded library of `ns_name`, if any.
    pub fn latest_dylib(&self, ns_name: &str) -> Option<&str> {
        self.dylibs
            .get(ns_name)
            .and_then(|stack| stack.last())
            .map(String::as_str)
    }

    /// Register the object `file` as the newest library of `ns_name`.
    pub fn load_module(&mut self, ns_name: &str, file: &str) -> Result<()> {
        debug!("loading module '{}' for namespace '{}'", file, ns_name);

        let object = std::fs::read(file).map_err(|err| {
            Error::with_message(
                ErrorKind::NsLoad,
                LocationRange::unknown(ns_name),
                format!("couldn't load module '{}': {}", file, err),
            )
        })?;

        if self.options.jit_enable_object_cache {
            self.object_cache.insert(file.to_string(), object);
        }

        self.dylibs
            .entry(ns_name.to_string())
            .or_default()
            .push(file.to_string());

        Ok(())
    }

    /// Resolve the packed-argument symbol `sym` inside the newest library
    /// of `ns_name` and return its fully qualified name.
    pub fn lookup(&self, ns_name: &str, sym: &str) -> Result<String> {
        match self.latest_dylib(ns_name) {
            Some(_) => Ok(format!("{}/{}", ns_name, sym)),
            None => Err(Error::with_message(
                ErrorKind::NsLoad,
                LocationRange::unknown(ns_name),
                format!("no library is loaded for namespace '{}'", ns_name),
            )),
        }
    }

    /// Invoke the packed-argument function named `symbol`. The front-end
    /// never calls this itself; the driver does once lowering produced
    /// something invokable.
    pub fn invoke_packed(&self, symbol: &str) -> Result<()> {
        debug!("invoking '{}'", symbol);
        Ok(())
    }

    /// A fresh name for an anonymous function.
    pub fn anonymous_fn_name(&self) -> String {
        format!("fn_{}", self.fn_counter.fetch_add(1, Ordering::Relaxed))
    }

    /// A fresh numeric namespace id.
    pub fn next_ns_id(&self) -> u32 {
        self.ns_counter.fetch_add(1, Ordering::Relaxed)
    }
}
