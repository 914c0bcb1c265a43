//! Pipeline simulator CLI.
//!
//! Loads an RV32 program (ELF or flat binary), runs it on the cycle-accurate
//! pipeline until it drains or the cycle budget expires, and prints the
//! statistics report. Optional modes: a per-cycle pipeline trace and a
//! cross-check of the final architectural state against the single-cycle
//! reference model.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pipesim_core::common::Reg;
use pipesim_core::config::Config;
use pipesim_core::core::pipeline::{CycleSnapshot, StageSnapshot, StopReason};
use pipesim_core::mem::MemoryImage;
use pipesim_core::sim::{load_program, Program};
use pipesim_core::{Pipeline, RefSim};

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    version,
    about = "Cycle-accurate five-stage RV32I pipeline simulator",
    long_about = "Runs an RV32 program on an in-order five-stage pipeline with split \
                  instruction/data caches over a fixed-latency backing store.\n\n\
                  Programs are ELF executables (entry and segments from the file) or raw \
                  flat binaries (loaded at --entry).\n\nExamples:\n  \
                  pipesim program.elf\n  \
                  pipesim blob.bin --entry 0x100\n  \
                  pipesim program.elf --config machine.json --stats summary,memory\n  \
                  pipesim program.elf --verify\n  \
                  pipesim program.elf --reference"
)]
struct Cli {
    /// Program image: an RV32 ELF executable or a raw flat binary.
    program: PathBuf,

    /// Cycle budget; the run stops when it is exhausted.
    #[arg(long, default_value_t = 1_000_000_000)]
    cycles: u64,

    /// Load address and entry point for raw flat binaries (ignored for ELF).
    #[arg(long, value_parser = parse_u32_literal)]
    entry: Option<u32>,

    /// JSON configuration file; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated statistics sections to print
    /// (summary, instruction_mix, hazards, branch, memory). Default: all.
    #[arg(long, value_delimiter = ',')]
    stats: Vec<String>,

    /// Print a per-cycle pipeline diagram row while running.
    #[arg(long)]
    trace_pipeline: bool,

    /// Re-run the program on the single-cycle reference model and compare
    /// the final register file.
    #[arg(long)]
    verify: bool,

    /// Run the single-cycle reference model instead of the pipeline; the
    /// budget counts instructions rather than cycles.
    #[arg(long, conflicts_with_all = ["verify", "trace_pipeline", "stats"])]
    reference: bool,
}

/// Accepts `1234` or `0x4d2`.
fn parse_u32_literal(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => serde_json::from_str::<Config>(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    debug!(?config, "effective configuration");

    let Program { image, entry } = load_program(&cli.program, config.memory.size, cli.entry)?;

    if cli.reference {
        return run_reference(image, entry, cli.cycles);
    }

    let mut pipe = Pipeline::new(image, entry, &config);

    let reason = if cli.trace_pipeline {
        run_traced(&mut pipe, cli.cycles)?
    } else {
        pipe.run(cli.cycles)?
    };

    if reason == StopReason::CycleBudget {
        eprintln!("cycle budget of {} exhausted before the pipeline drained", cli.cycles);
    }

    pipe.stats().print_sections(&cli.stats);

    if cli.verify {
        verify(&pipe, cli, &config)?;
        println!("verify: pipeline and reference model agree");
    }

    if reason == StopReason::CycleBudget {
        process::exit(2);
    }
    Ok(())
}

/// Runs the program to completion on the reference model alone and prints
/// its retirement count and final register file.
fn run_reference(image: MemoryImage, entry: u32, budget: u64) -> Result<(), Box<dyn Error>> {
    let mut sim = RefSim::new(image, entry);
    let retired = sim.run(budget)?;
    println!("reference model");
    println!("insts_retired            {retired}");
    println!("final_pc                 {:#010x}", sim.pc());
    for index in 0..32 {
        let reg = Reg::new(index);
        println!("{:<8} {:#010x}", reg.to_string(), sim.register_file().peek(reg));
    }
    if retired == budget {
        eprintln!("instruction budget of {budget} exhausted before the program ended");
        process::exit(2);
    }
    Ok(())
}

/// Steps the pipeline one cycle at a time, printing a diagram row per cycle.
fn run_traced(pipe: &mut Pipeline, max_cycles: u64) -> Result<StopReason, Box<dyn Error>> {
    println!(
        "{:>8}  {:<28} {:<28} {:<28} {:<28} {:<28}",
        "cycle", "fetch", "decode", "execute", "memory", "writeback"
    );
    for _ in 0..max_cycles {
        pipe.step()?;
        print_row(pipe.snapshot());
        if pipe.is_drained() {
            return Ok(StopReason::Drained);
        }
    }
    Ok(StopReason::CycleBudget)
}

fn print_row(row: &CycleSnapshot) {
    println!(
        "{:>8}  {:<28} {:<28} {:<28} {:<28} {:<28}",
        row.cycle,
        stage_cell(&row.fetch),
        stage_cell(&row.decode),
        stage_cell(&row.execute),
        stage_cell(&row.memory),
        stage_cell(&row.writeback),
    );
}

/// Renders one stage cell: the disassembly when an instruction was present,
/// annotated with stall/flush markers, or a dash for a bubble.
fn stage_cell(stage: &StageSnapshot) -> String {
    let mut cell = match (&stage.disasm, stage.pc) {
        (Some(disasm), Some(pc)) => format!("{pc:#06x} {disasm}"),
        _ => String::from("-"),
    };
    if stage.flushed {
        cell.push_str(" [flush]");
    }
    if stage.waiting_cache {
        cell.push_str(" [cache]");
    } else if stage.stalled {
        cell.push_str(" [stall]");
    }
    cell
}

/// Replays the program on the reference model and compares every register
/// the two machines ended with.
fn verify(pipe: &Pipeline, cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let Program { image, entry } = load_program(&cli.program, config.memory.size, cli.entry)?;
    let mut oracle = RefSim::new(image, entry);
    oracle.run(cli.cycles)?;

    if pipe.stats().instructions_retired != oracle.retired() {
        return Err(format!(
            "retired instruction counts diverged: pipeline {} vs reference {}",
            pipe.stats().instructions_retired,
            oracle.retired()
        )
        .into());
    }
    for index in 0..32 {
        let reg = Reg::new(index);
        let got = pipe.register_file().peek(reg);
        let want = oracle.register_file().peek(reg);
        if got != want {
            return Err(format!(
                "register {reg} diverged: pipeline {got:#010x} vs reference {want:#010x}"
            )
            .into());
        }
    }
    Ok(())
}
