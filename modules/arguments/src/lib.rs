//! Scalar parameter passing example
//!
//! The smallest interesting module: two process-wide settings, populated by
//! the host before `init` runs. `whom` stays writable through the host's
//! parameter surface while the module is resident; `loop_count` is fixed at
//! load. On `init` the module logs its count and greets `whom` that many
//! times; on `exit` it logs a marker and nothing else.

use modkit_sdk::prelude::*;

pub struct Arguments {
    whom: Param<String>,
    loop_count: Param<i32>,
}

modkit_sdk::module! {
    type: Arguments,
    name: "arguments",
    author: "ModKit Contributors",
    description: "Argument passing example",
    license: "GPL",
    params: {
        whom: str { default: "Embedded", mode: Mode::RW, desc: "name to greet" },
        loop_count: int { default: 1, mode: Mode::RO, desc: "number of greetings to print" },
    },
}

impl KernelModule for Arguments {
    fn init(&mut self, console: &mut dyn Console) -> modkit_sdk::Result<()> {
        pr_info!(console, "arguments: in init");
        pr_info!(console, "arguments: loop count: {}", *self.loop_count);
        // A non-positive count greets nobody
        for _ in 0..*self.loop_count {
            pr_info!(console, "arguments: hi {}", *self.whom);
        }
        Ok(())
    }

    fn exit(&mut self, console: &mut dyn Console) {
        pr_info!(console, "arguments: in exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit_sdk::console::BufferConsole;
    use modkit_sdk::param::ParamTable;

    fn boot(table: &ParamTable) -> BufferConsole {
        let mut module = (MODULE.build)(table).unwrap();
        let mut console = BufferConsole::new();
        module.init(&mut console).unwrap();
        module.exit(&mut console);
        console
    }

    #[test]
    fn defaults_greet_embedded_once() {
        let table = ParamTable::from_specs(MODULE.params);
        let console = boot(&table);
        assert_eq!(
            console.lines(),
            [
                "arguments: in init",
                "arguments: loop count: 1",
                "arguments: hi Embedded",
                "arguments: in exit",
            ]
        );
    }

    #[test]
    fn count_controls_repetition() {
        let mut table = ParamTable::from_specs(MODULE.params);
        table.set("whom", Some("World")).unwrap();
        table.set("loop_count", Some("3")).unwrap();

        let console = boot(&table);
        let greetings = console
            .lines()
            .iter()
            .filter(|l| l.as_str() == "arguments: hi World")
            .count();
        assert_eq!(greetings, 3);
    }

    #[test]
    fn non_positive_count_greets_nobody() {
        for count in ["0", "-5"] {
            let mut table = ParamTable::from_specs(MODULE.params);
            table.set("loop_count", Some(count)).unwrap();

            let console = boot(&table);
            assert!(!console.lines().iter().any(|l| l.contains("hi")));
        }
    }
}
