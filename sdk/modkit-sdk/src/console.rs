//! Printk-style console sink
//!
//! Modules never talk to an output device directly: the host lends them a
//! [`Console`] for the duration of each lifecycle call and collects whatever
//! they print. Every write is fire-and-forget: there is no return value to
//! consult and no failure path.

use core::fmt;

pub use log::Level;

/// Append-only, ordered, line-structured output sink.
///
/// The host's implementation keeps the lines for later inspection (its
/// `dmesg`); [`NullConsole`] discards them; [`BufferConsole`] is a plain
/// in-memory sink for module unit tests.
pub trait Console {
    /// Append one formatted line to the sink.
    fn write_line(&mut self, level: Level, args: fmt::Arguments<'_>);
}

/// Console that discards all output.
pub struct NullConsole;

impl Console for NullConsole {
    #[inline(always)]
    fn write_line(&mut self, _level: Level, _args: fmt::Arguments<'_>) {
        // Discard output
    }
}

/// In-memory console for tests.
#[derive(Default)]
pub struct BufferConsole {
    lines: Vec<String>,
}

impl BufferConsole {
    /// Create a new empty buffer console
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines captured so far, in write order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drop all captured lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, _level: Level, args: fmt::Arguments<'_>) {
        self.lines.push(args.to_string());
    }
}

/// Print an info-level line to a console.
///
/// The first argument is the console handle; the rest is a `format!` list.
#[macro_export]
macro_rules! pr_info {
    ($console:expr, $($arg:tt)*) => {
        $crate::console::Console::write_line(
            $console,
            $crate::console::Level::Info,
            ::core::format_args!($($arg)*),
        )
    };
}

/// Print a debug-level line to a console.
#[macro_export]
macro_rules! pr_debug {
    ($console:expr, $($arg:tt)*) => {
        $crate::console::Console::write_line(
            $console,
            $crate::console::Level::Debug,
            ::core::format_args!($($arg)*),
        )
    };
}

/// Print a warning-level line to a console.
#[macro_export]
macro_rules! pr_warn {
    ($console:expr, $($arg:tt)*) => {
        $crate::console::Console::write_line(
            $console,
            $crate::console::Level::Warn,
            ::core::format_args!($($arg)*),
        )
    };
}

/// Print an error-level line to a console.
#[macro_export]
macro_rules! pr_err {
    ($console:expr, $($arg:tt)*) => {
        $crate::console::Console::write_line(
            $console,
            $crate::console::Level::Error,
            ::core::format_args!($($arg)*),
        )
    };
}
