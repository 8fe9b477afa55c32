//! modkit-ctl - CLI for the bundled example modules
//!
//! Commands:
//! - `modkit-ctl list` - Show bundled modules and their parameters
//! - `modkit-ctl probe <module> [key=value ...]` - Load, print the kernel log, unload
//! - `modkit-ctl params <module> [key=value ...]` - Show the populated parameter table

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use modkit_sdk::module::ModuleDescriptor;
use module_host::ModuleHost;

#[derive(Parser)]
#[command(name = "modkit-ctl")]
#[command(version)]
#[command(about = "Drive the bundled parameter-passing example modules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bundled modules and their parameters
    List,

    /// Load a module, print the kernel log, then unload it
    Probe {
        /// Module name
        module: String,
        /// insmod-style key=value arguments
        args: Vec<String>,
    },

    /// Show the parameter table of a module loaded with the given arguments
    Params {
        /// Module name
        module: String,
        /// insmod-style key=value arguments
        args: Vec<String>,
    },
}

/// Every module bundled with this tool
static REGISTRY: &[&ModuleDescriptor] = &[&arguments::MODULE, &parameter_array::MODULE];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            list_modules();
        }

        Commands::Probe { module, args } => {
            probe_module(&module, &args.join(" "))?;
        }

        Commands::Params { module, args } => {
            show_params(&module, &args.join(" "))?;
        }
    }

    Ok(())
}

fn find_module(name: &str) -> anyhow::Result<&'static ModuleDescriptor> {
    REGISTRY
        .iter()
        .copied()
        .find(|descriptor| descriptor.name == name)
        .with_context(|| format!("no bundled module named `{name}`"))
}

fn list_modules() {
    for descriptor in REGISTRY {
        println!("{}", descriptor.name.bold());
        if let Some(description) = descriptor.description {
            println!("  {description}");
        }
        if let Some(author) = descriptor.author {
            println!("  author: {author}");
        }
        println!("  license: {}", descriptor.license);
        for spec in descriptor.params {
            println!(
                "  {} ({}, mode {:04o}) - {}",
                spec.name.green(),
                spec.kind,
                spec.mode.bits(),
                spec.description,
            );
        }
        println!();
    }
}

fn probe_module(name: &str, args: &str) -> anyhow::Result<()> {
    let descriptor = find_module(name)?;
    let mut host = ModuleHost::new();

    host.load(descriptor, args)
        .with_context(|| format!("loading `{name}` failed"))?;
    host.unload(name)?;

    for line in host.dmesg() {
        println!("{line}");
    }
    Ok(())
}

fn show_params(name: &str, args: &str) -> anyhow::Result<()> {
    let descriptor = find_module(name)?;
    let mut host = ModuleHost::new();

    host.load(descriptor, args)
        .with_context(|| format!("loading `{name}` failed"))?;

    for entry in host.param_table(name)?.entries() {
        let spec = entry.spec();
        println!(
            "{} = {} ({}, mode {:04o})",
            spec.name.green(),
            entry.value().render(),
            spec.kind,
            spec.mode.bits(),
        );
    }

    host.unload(name)?;
    Ok(())
}
