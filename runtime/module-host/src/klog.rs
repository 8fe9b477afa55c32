//! Host-owned kernel log
//!
//! The host's implementation of the SDK console sink. Lines are kept in
//! write order for inspection through [`ModuleHost::dmesg`](crate::ModuleHost::dmesg)
//! and mirrored to the `log` facade (target `kmsg`) for whoever has a
//! logger installed.

use core::fmt;

use modkit_sdk::console::{Console, Level};

/// Append-only, ordered line log
#[derive(Default)]
pub struct KernelLog {
    lines: Vec<String>,
}

impl KernelLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line printed since creation (or the last clear), in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Console for KernelLog {
    fn write_line(&mut self, level: Level, args: fmt::Arguments<'_>) {
        let line = args.to_string();
        log::log!(target: "kmsg", level, "{line}");
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit_sdk::pr_info;

    #[test]
    fn lines_accumulate_in_order() {
        let mut klog = KernelLog::new();
        pr_info!(&mut klog, "one");
        pr_info!(&mut klog, "two: {}", 2);
        assert_eq!(klog.lines(), ["one", "two: 2"]);

        klog.clear();
        assert!(klog.lines().is_empty());
    }
}
