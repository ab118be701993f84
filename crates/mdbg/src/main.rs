use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use mdbg_core::asm::signature;
use mdbg_core::error::MdbgError;
use mdbg_core::{DebugSession, PcOffset, Result as MdbgResult};
use mdbg_utils::{info, init_logging};

/// Offline debug-info tooling for the Maple bytecode runtime.
#[derive(Parser, Debug)]
#[command(name = "mdbg")]
#[command(version)]
#[command(about = "Inspect Maple symbol files and resolve pc offsets to source", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Resolve a pc offset within a function to its originating source line
    Resolve
    {
        /// Path to the assembly symbol file (.s / .VtableImpl.s)
        asm: PathBuf,
        /// Function label (with or without the _mirbin_info suffix)
        func: String,
        /// Pc offset within the function (hex, e.g. 0054 or 0x54)
        pc: String,
    },
    /// List the function blocks indexed from a symbol file
    Index
    {
        /// Path to the assembly symbol file
        asm: PathBuf,
    },
    /// Decode a function's formal-argument and local-variable signature
    Signature
    {
        /// Path to the assembly symbol file
        asm: PathBuf,
        /// Function label (with or without the _mirbin_info suffix)
        func: String,
    },
    /// Print a class's inheritance chain from a macro-definition file
    Chain
    {
        /// Path to the layout file (.macros.def)
        defs: PathBuf,
        /// Mangled class name
        class: String,
    },
    /// List classes in a layout file whose name contains a substring
    Classes
    {
        /// Path to the layout file (.macros.def)
        defs: PathBuf,
        /// Substring to match against class names
        pattern: String,
    },
}

fn main()
{
    // Initialize logging (reads from RUST_LOG env var)
    // Defaults to INFO level and Pretty format if not set
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> MdbgResult<()>
{
    let session = DebugSession::new();

    match cli.command {
        Commands::Resolve { asm, func, pc } => {
            let pc = PcOffset::parse(&pc)
                .ok_or_else(|| MdbgError::InvalidArgument(format!("`{pc}` is not a hex pc offset")))?;
            info!("resolving {} at pc {} in {}", func, pc, asm.display());

            let Some(frame) = session.describe_frame(&asm, &func, pc)? else {
                println!("Function not found: {}", func);
                return Ok(());
            };

            println!("Function: {}", frame.function);
            match &frame.source {
                Some(hit) => match (&hit.file, hit.line) {
                    (Some(file), line) => {
                        println!("Source:   {}:{}", file, line);
                        if let Some(idx) = &hit.inst_index {
                            println!("Instidx:  {}", idx);
                        }
                    }
                    (None, -1) => println!("Source:   <class initializer check>"),
                    (None, _) => println!("Source:   <no mapping>"),
                },
                None => println!("Source:   pc {} not found in block", pc),
            }
            if let Some(sig) = &frame.signature {
                print_signature(sig);
            }
            Ok(())
        }
        Commands::Index { asm } => {
            let index = session.store().index(&asm)?;
            let mut entries: Vec<_> = index.entries().collect();
            entries.sort_by_key(|entry| entry.start_line);
            println!("{} function blocks in {}", entries.len(), asm.display());
            for entry in entries {
                println!(
                    "  line {:>6}  bytes {:>8}..{:<8}  {}",
                    entry.start_line, entry.start_offset, entry.end_offset, entry.label
                );
            }
            Ok(())
        }
        Commands::Signature { asm, func } => {
            let Some(entry) = session.store().entry(&asm, &func)? else {
                println!("Function not found: {}", func);
                return Ok(());
            };
            match signature::decode(&asm, &entry.label, entry.start_offset)? {
                Some(sig) => print_signature(&sig),
                None => println!("Signature header malformed or unsupported for {}", func),
            }
            Ok(())
        }
        Commands::Chain { defs, class } => {
            let layout = session.store().layout(&defs)?;
            let Some(chain) = layout.chain(&class) else {
                println!("No complete inheritance chain for {}", class);
                return Ok(());
            };
            for record in chain {
                println!("{} (size {})", record.name, record.size);
                for field in &record.fields {
                    println!("    +{:<4} {:<4} {}", field.offset, field.length, field.name);
                }
            }
            Ok(())
        }
        Commands::Classes { defs, pattern } => {
            let layout = session.store().layout(&defs)?;
            let matches = layout.find_classes(&pattern);
            println!("{} classes matching `{}`", matches.len(), pattern);
            for name in matches {
                println!("  {}", name);
            }
            Ok(())
        }
    }
}

fn print_signature(sig: &mdbg_core::FunctionSignature)
{
    println!("Formals:  {}", format_variables(&sig.formals_type, &sig.formals_name));
    println!("Locals:   {}", format_variables(&sig.locals_type, &sig.locals_name));
}

fn format_variables(types: &[mdbg_core::PrimType], names: &[String]) -> String
{
    if names.is_empty() {
        return "(none)".to_string();
    }
    types
        .iter()
        .zip(names)
        .map(|(ty, name)| format!("{ty} {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
