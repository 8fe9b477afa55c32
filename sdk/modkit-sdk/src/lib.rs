//! ModKit SDK
//!
//! Module-facing API for the ModKit playground. A module built against this
//! crate looks like a loadable kernel module: it declares its metadata and
//! parameters with the [`module!`] macro, implements the
//! [`module::KernelModule`] lifecycle trait, and prints through the
//! [`console`] sink the host lends it. Everything else (argument parsing,
//! permission checks, the lifecycle itself) belongs to the host runtime.
//!
//! # Modules
//! - [`module`]: lifecycle trait, module descriptors, the `module!` macro
//! - [`param`]: typed parameters, access modes, parse rules
//! - [`console`]: printk-style line sink shared by host and modules
//!
//! # Example
//! ```
//! use modkit_sdk::prelude::*;
//!
//! struct Hello {
//!     whom: Param<String>,
//! }
//!
//! modkit_sdk::module! {
//!     type: Hello,
//!     name: "hello",
//!     license: "GPL",
//!     params: {
//!         whom: str { default: "world", mode: Mode::RO, desc: "who to greet" },
//!     },
//! }
//!
//! impl KernelModule for Hello {
//!     fn init(&mut self, console: &mut dyn Console) -> modkit_sdk::Result<()> {
//!         pr_info!(console, "hello {}", *self.whom);
//!         Ok(())
//!     }
//! }
//! ```

pub mod console;
pub mod module;
pub mod param;

use thiserror::Error;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error a module may surface from its `init` operation.
///
/// The bundled example modules never fail, but the lifecycle contract keeps
/// the failure path so the host can treat a refused `init` like a failed
/// `insmod`.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module initialization failed: {0}")]
    Init(String),
}

/// Result type for module lifecycle operations
pub type Result<T> = core::result::Result<T, ModuleError>;

/// Common imports for module authors
pub mod prelude {
    pub use crate::console::Console;
    pub use crate::module::{KernelModule, ModuleDescriptor};
    pub use crate::param::{ArrayParam, Mode, Param};
    pub use crate::{pr_debug, pr_err, pr_info, pr_warn};
}
