//! Module lifecycle and declaration
//!
//! # Purpose
//! A module is a struct implementing [`KernelModule`] plus a static
//! [`ModuleDescriptor`] the host loads it through. The [`module!`](crate::module!)
//! macro generates the descriptor (metadata, parameter table, and the
//! constructor wiring parsed parameters into the struct's fields) so a
//! module source reads like its kernel counterpart: declaration up top,
//! lifecycle impl below.
//!
//! # Lifecycle
//! Exactly two states per load cycle: unloaded and resident. The host calls
//! `init` once to enter residency and `exit` once to leave it; no other
//! transition exists. Both calls receive the host's console sink.

use crate::console::Console;
use crate::param::{ParamError, ParamSpec, ParamTable};
use crate::Result;

/// Module lifecycle operations, driven by the host.
pub trait KernelModule {
    /// Runs once, after parameters are populated, to enter residency.
    fn init(&mut self, console: &mut dyn Console) -> Result<()>;

    /// Runs once, when the host unloads the module. Infallible.
    fn exit(&mut self, _console: &mut dyn Console) {}
}

/// Constructor the host uses to build a module instance from its parsed
/// parameter table.
pub type BuildFn = fn(&ParamTable) -> core::result::Result<Box<dyn KernelModule>, ParamError>;

/// Everything the host needs to know about a module before loading it.
pub struct ModuleDescriptor {
    pub name: &'static str,
    pub author: Option<&'static str>,
    pub description: Option<&'static str>,
    pub license: &'static str,
    pub params: &'static [ParamSpec],
    pub build: BuildFn,
}

/// Declare a module: metadata, parameters, and the glue between the two.
///
/// Generates a `pub static MODULE: ModuleDescriptor` whose constructor
/// fills the module struct's fields from the host-parsed parameter table.
/// Field names must match parameter names; field types follow the kind
/// (`str` → `Param<String>`, `int` → `Param<i32>`, `bool` → `Param<bool>`,
/// `[i32; N]` → `ArrayParam<N>`).
///
/// # Example
/// ```ignore
/// modkit_sdk::module! {
///     type: Arguments,
///     name: "arguments",
///     author: "ModKit Contributors",
///     description: "Argument passing example",
///     license: "GPL",
///     params: {
///         whom: str { default: "Embedded", mode: Mode::RW, desc: "name to greet" },
///         loop_count: int { default: 1, mode: Mode::RO, desc: "number of greetings" },
///     },
/// }
/// ```
#[macro_export]
macro_rules! module {
    (
        type: $module:ident,
        name: $name:expr,
        $(author: $author:expr,)?
        $(description: $description:expr,)?
        license: $license:expr,
        params: {
            $($pname:ident : $pkind:tt { $($pbody:tt)* }),+ $(,)?
        } $(,)?
    ) => {
        /// Descriptor the module host loads this module through.
        pub static MODULE: $crate::module::ModuleDescriptor = $crate::module::ModuleDescriptor {
            name: $name,
            author: {
                let author: ::core::option::Option<&'static str> = ::core::option::Option::None;
                $(let author = ::core::option::Option::Some($author);)?
                author
            },
            description: {
                let description: ::core::option::Option<&'static str> = ::core::option::Option::None;
                $(let description = ::core::option::Option::Some($description);)?
                description
            },
            license: $license,
            params: &[$($crate::__param_spec!($pname, $pkind { $($pbody)* })),+],
            build: |table| {
                ::core::result::Result::Ok(::std::boxed::Box::new($module {
                    $($pname: $crate::__param_field!(table, $pname, $pkind { $($pbody)* })),+
                }))
            },
        };
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __param_spec {
    ($pname:ident, str { default: $default:expr, mode: $mode:expr, desc: $desc:expr $(,)? }) => {
        $crate::param::ParamSpec {
            name: ::core::stringify!($pname),
            kind: $crate::param::ParamKind::Str,
            default: $crate::param::DefaultValue::Str($default),
            mode: $mode,
            description: $desc,
        }
    };
    ($pname:ident, int { default: $default:expr, mode: $mode:expr, desc: $desc:expr $(,)? }) => {
        $crate::param::ParamSpec {
            name: ::core::stringify!($pname),
            kind: $crate::param::ParamKind::Int,
            default: $crate::param::DefaultValue::Int($default),
            mode: $mode,
            description: $desc,
        }
    };
    ($pname:ident, bool { default: $default:expr, mode: $mode:expr, desc: $desc:expr $(,)? }) => {
        $crate::param::ParamSpec {
            name: ::core::stringify!($pname),
            kind: $crate::param::ParamKind::Bool,
            default: $crate::param::DefaultValue::Bool($default),
            mode: $mode,
            description: $desc,
        }
    };
    ($pname:ident, [i32; $capacity:expr] { mode: $mode:expr, desc: $desc:expr $(,)? }) => {
        $crate::param::ParamSpec {
            name: ::core::stringify!($pname),
            kind: $crate::param::ParamKind::IntArray { capacity: $capacity },
            default: $crate::param::DefaultValue::IntArray(&[]),
            mode: $mode,
            description: $desc,
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __param_field {
    ($table:ident, $pname:ident, str { $($rest:tt)* }) => {
        $crate::param::Param::new($table.get_str(::core::stringify!($pname))?)
    };
    ($table:ident, $pname:ident, int { $($rest:tt)* }) => {
        $crate::param::Param::new($table.get_int(::core::stringify!($pname))?)
    };
    ($table:ident, $pname:ident, bool { $($rest:tt)* }) => {
        $crate::param::Param::new($table.get_bool(::core::stringify!($pname))?)
    };
    ($table:ident, $pname:ident, [i32; $capacity:expr] { $($rest:tt)* }) => {{
        let (slots, supplied) = $table.get_int_array::<{ $capacity }>(::core::stringify!($pname))?;
        $crate::param::ArrayParam::new(slots, supplied)
    }};
}

#[cfg(test)]
mod tests {
    use crate::console::{BufferConsole, Console};
    use crate::param::{Mode, ParamKind, ParamTable};
    use crate::pr_info;

    struct Probe {
        greeting: crate::param::Param<String>,
        shots: crate::param::Param<i32>,
    }

    crate::module! {
        type: Probe,
        name: "probe",
        description: "macro expansion probe",
        license: "GPL",
        params: {
            greeting: str { default: "ping", mode: Mode::RO, desc: "what to print" },
            shots: int { default: 2, mode: Mode::RO, desc: "how often" },
        },
    }

    impl super::KernelModule for Probe {
        fn init(&mut self, console: &mut dyn Console) -> crate::Result<()> {
            for _ in 0..*self.shots {
                pr_info!(console, "{}", *self.greeting);
            }
            Ok(())
        }
    }

    #[test]
    fn descriptor_carries_declared_metadata() {
        assert_eq!(MODULE.name, "probe");
        assert_eq!(MODULE.author, None);
        assert_eq!(MODULE.description, Some("macro expansion probe"));
        assert_eq!(MODULE.license, "GPL");
        assert_eq!(MODULE.params.len(), 2);
        assert_eq!(MODULE.params[0].name, "greeting");
        assert_eq!(MODULE.params[0].kind, ParamKind::Str);
        assert_eq!(MODULE.params[1].name, "shots");
    }

    #[test]
    fn build_wires_table_values_into_fields() {
        let mut table = ParamTable::from_specs(MODULE.params);
        table.set("shots", Some("3")).unwrap();

        let mut module = (MODULE.build)(&table).unwrap();
        let mut console = BufferConsole::new();
        module.init(&mut console).unwrap();
        assert_eq!(console.lines(), ["ping", "ping", "ping"]);
    }
}
