//! Array parameter passing example
//!
//! One owner-only setting: up to four integers, supplied as a single
//! comma-separated value that the host splits into the array, recording how
//! many elements it found. `init` prints the supplied count and then all
//! four slots; unsupplied slots keep their zero default. Capacity is
//! enforced by the host's parser; by the time `init` runs the array is
//! known to fit.

use modkit_sdk::prelude::*;

pub struct ParameterArray {
    values: ArrayParam<4>,
}

modkit_sdk::module! {
    type: ParameterArray,
    name: "parameter_array",
    description: "Array parameter passing example",
    license: "GPL",
    params: {
        values: [i32; 4] { mode: Mode::OWNER_RW, desc: "up to four integers" },
    },
}

impl KernelModule for ParameterArray {
    fn init(&mut self, console: &mut dyn Console) -> modkit_sdk::Result<()> {
        pr_info!(console, "parameter_array: in init");
        pr_info!(console, "parameter_array: argc count: {}", self.values.supplied());
        pr_info!(console, "parameter_array: array elements:");
        for (index, value) in self.values.iter().enumerate() {
            pr_info!(console, "{index}:\t{value}");
        }
        Ok(())
    }

    fn exit(&mut self, console: &mut dyn Console) {
        pr_info!(console, "parameter_array: in exit");
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
    fn defaults_print_four_zero_slots() {
        let table = ParamTable::from_specs(MODULE.params);
        let console = boot(&table);
        assert_eq!(
            console.lines(),
            [
                "parameter_array: in init",
                "parameter_array: argc count: 0",
                "parameter_array: array elements:",
                "0:\t0",
                "1:\t0",
                "2:\t0",
                "3:\t0",
                "parameter_array: in exit",
            ]
        );
    }

    #[test]
    fn partial_supply_leaves_zero_tail() {
        let mut table = ParamTable::from_specs(MODULE.params);
        table.set("values", Some("7,9")).unwrap();

        let console = boot(&table);
        assert!(console
            .lines()
            .contains(&"parameter_array: argc count: 2".to_string()));
        assert_eq!(
            &console.lines()[3..7],
            ["0:\t7", "1:\t9", "2:\t0", "3:\t0"]
        );
    }

    #[test]
    fn full_supply_populates_every_slot() {
        let mut table = ParamTable::from_specs(MODULE.params);
        table.set("values", Some("1,2,3,4")).unwrap();

        let console = boot(&table);
        assert!(console
            .lines()
            .contains(&"parameter_array: argc count: 4".to_string()));
        assert_eq!(
            &console.lines()[3..7],
            ["0:\t1", "1:\t2", "2:\t3", "3:\t4"]
        );
    }
}
