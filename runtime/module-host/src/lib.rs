//! Module host - userspace stand-in for the kernel's module loader
//!
//! # Purpose
//! Plays the external-host role the kernel plays for a real loadable
//! module: it parses `key=value` argument lines into each module's typed
//! parameter table, drives the two-state lifecycle (`init` on load, `exit`
//! on unload), enforces the declared permission bits on its sysfs-like
//! parameter surface, and owns the ordered kernel log every module prints
//! into.
//!
//! # Architecture
//! [`ModuleHost`] keeps a registry of resident modules. Loading rejects bad
//! configuration (unknown keys, malformed numbers, array overflow) before
//! the module instance is built, so a module's `init` only ever observes a
//! fully populated table. Modules themselves stay validation-free.
//!
//! # Testing Strategy
//! - Unit tests: argument grammar, log ordering
//! - Integration tests: full load/print/unload cycles of the bundled
//!   example modules (see `tests/integration_test.rs`)

mod cmdline;
mod klog;

pub use cmdline::{parse as parse_cmdline, Arg, CmdlineError};
pub use klog::KernelLog;

use modkit_sdk::module::{KernelModule, ModuleDescriptor};
use modkit_sdk::param::{ParamError, ParamTable};
use modkit_sdk::ModuleError;
use thiserror::Error;

/// Error types for host operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("module `{name}` is already loaded")]
    AlreadyLoaded { name: String },

    #[error("module `{name}` is not loaded")]
    NotLoaded { name: String },

    #[error(transparent)]
    Cmdline(#[from] CmdlineError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("parameter `{name}` is not readable")]
    NotReadable { name: String },

    #[error("parameter `{name}` is not writable")]
    NotWritable { name: String },

    #[error("module `{name}` failed to initialize: {source}")]
    InitFailed { name: String, source: ModuleError },
}

pub type Result<T> = core::result::Result<T, HostError>;

/// A resident module and its parameter state
struct LoadedModule {
    descriptor: &'static ModuleDescriptor,
    instance: Box<dyn KernelModule>,
    table: ParamTable,
}

/// The module loader.
///
/// All operations take `&mut self`: lifecycle calls and parameter writes
/// are serialized by construction, which is the whole of the concurrency
/// model: `init` runs to completion before anything else touches the
/// module, and `exit` runs only once the host decides to unload.
#[derive(Default)]
pub struct ModuleHost {
    loaded: Vec<LoadedModule>,
    klog: KernelLog,
}

impl ModuleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a module: parse `args`, populate its parameter table, build the
    /// instance, and run `init`.
    ///
    /// A failed load leaves no trace in the registry and never runs `init`.
    pub fn load(&mut self, descriptor: &'static ModuleDescriptor, args: &str) -> Result<()> {
        if self.slot(descriptor.name).is_some() {
            return Err(HostError::AlreadyLoaded {
                name: descriptor.name.to_string(),
            });
        }

        let mut table = ParamTable::from_specs(descriptor.params);
        for arg in cmdline::parse(args)? {
            table.set(&arg.key, arg.value.as_deref())?;
        }

        log::debug!(target: "module-host", "loading `{}` args=`{}`", descriptor.name, args);
        let mut instance = (descriptor.build)(&table)?;
        instance
            .init(&mut self.klog)
            .map_err(|source| HostError::InitFailed {
                name: descriptor.name.to_string(),
                source,
            })?;

        self.loaded.push(LoadedModule {
            descriptor,
            instance,
            table,
        });
        Ok(())
    }

    /// Unload a resident module, running its `exit`.
    ///
    /// Unloading never touches stored parameter values; a later reload with
    /// the same argument line reproduces the same output.
    pub fn unload(&mut self, name: &str) -> Result<()> {
        let index = self
            .loaded
            .iter()
            .position(|m| m.descriptor.name == name)
            .ok_or_else(|| HostError::NotLoaded {
                name: name.to_string(),
            })?;

        let mut module = self.loaded.remove(index);
        module.instance.exit(&mut self.klog);
        log::debug!(target: "module-host", "unloaded `{name}`");
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// Read a parameter through the sysfs-like show surface.
    ///
    /// Denied unless the parameter's mode carries a read bit.
    pub fn param_show(&self, module: &str, param: &str) -> Result<String> {
        let slot = self.require(module)?;
        let entry = slot
            .table
            .entry(param)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: param.to_string(),
            })?;
        if !entry.spec().mode.readable() {
            return Err(HostError::NotReadable {
                name: param.to_string(),
            });
        }
        Ok(entry.value().render())
    }

    /// Write a parameter through the sysfs-like store surface.
    ///
    /// Denied unless the parameter's mode carries the owner write bit. The
    /// value goes through the same typed parser as load-time arguments.
    pub fn param_store(&mut self, module: &str, param: &str, value: &str) -> Result<()> {
        let slot = self.require_mut(module)?;
        let entry = slot
            .table
            .entry(param)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: param.to_string(),
            })?;
        if !entry.spec().mode.writable() {
            return Err(HostError::NotWritable {
                name: param.to_string(),
            });
        }
        slot.table.set(param, Some(value))?;
        Ok(())
    }

    /// Parameter table of a resident module, in declaration order
    pub fn param_table(&self, module: &str) -> Result<&ParamTable> {
        Ok(&self.require(module)?.table)
    }

    /// Every line the resident modules have printed, in order
    pub fn dmesg(&self) -> &[String] {
        self.klog.lines()
    }

    pub fn clear_dmesg(&mut self) {
        self.klog.clear();
    }

    fn slot(&self, name: &str) -> Option<&LoadedModule> {
        self.loaded.iter().find(|m| m.descriptor.name == name)
    }

    fn require(&self, name: &str) -> Result<&LoadedModule> {
        self.slot(name).ok_or_else(|| HostError::NotLoaded {
            name: name.to_string(),
        })
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut LoadedModule> {
        self.loaded
            .iter_mut()
            .find(|m| m.descriptor.name == name)
            .ok_or_else(|| HostError::NotLoaded {
                name: name.to_string(),
            })
    }
}
