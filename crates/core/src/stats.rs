//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline simulator. It
//! provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics.
//! 2. **Ownership accounting:** Fetched, retired, and flushed instruction counts.
//! 3. **Hazards:** Data, control, and structural stall cycle counts.
//! 4. **Branches:** Static not-taken prediction outcomes.
//! 5. **Caches:** Hit/miss counts for the instruction and data caches.

use std::time::Instant;

/// Performance counters accumulated over one simulation run.
///
/// Every counter is incremented by the pipeline as it steps; nothing here
/// feeds back into simulated behavior.
#[derive(Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Instructions that entered the pipeline at fetch.
    pub instructions_fetched: u64,
    /// Instructions that completed writeback.
    pub instructions_retired: u64,
    /// Instructions discarded by control-flow flushes.
    pub instructions_flushed: u64,

    /// Count of ALU (register/immediate arithmetic) instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of branch and jump instructions retired.
    pub inst_branch: u64,

    /// Branches whose static not-taken prediction was correct.
    pub branch_predictions: u64,
    /// Branches that redirected the front end (mispredictions).
    pub branch_mispredictions: u64,

    /// Stall cycles caused by unavailable source operands.
    pub stalls_data: u64,
    /// Stall cycles caused by flushes after a taken branch.
    pub stalls_control: u64,
    /// Stall cycles caused by busy caches or multi-beat accesses.
    pub stalls_structural: u64,
    /// Cycles in which more than one hazard kind was active at once.
    pub multi_hazard_cycles: u64,

    /// Instruction cache hit count.
    pub icache_hits: u64,
    /// Instruction cache miss count.
    pub icache_misses: u64,
    /// Data cache hit count.
    pub dcache_hits: u64,
    /// Data cache miss count.
    pub dcache_misses: u64,
    /// Lines written back to the backing store on eviction.
    pub dcache_evictions: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_fetched: 0,
            instructions_retired: 0,
            instructions_flushed: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            branch_predictions: 0,
            branch_mispredictions: 0,
            stalls_data: 0,
            stalls_control: 0,
            stalls_structural: 0,
            multi_hazard_cycles: 0,
            icache_hits: 0,
            icache_misses: 0,
            dcache_hits: 0,
            dcache_misses: 0,
            dcache_evictions: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"hazards"`,
/// `"branch"`, `"memory"`. Pass an empty slice to `print_sections` to print
/// all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "hazards", "branch", "memory"];

impl SimStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of the names in
    /// [`STATS_SECTIONS`]. Pass an empty slice to print all sections (same as
    /// `print()`).
    ///
    /// # Panics
    ///
    /// This function will not panic: all divisors are clamped to at least one
    /// before any division.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };

        if want("summary") {
            let ipc = self.instructions_retired as f64 / cyc as f64;
            let cpi = cyc as f64 / instr as f64;
            println!("\n==========================================================");
            println!("PIPELINE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("insts_fetched            {}", self.instructions_fetched);
            println!("insts_retired            {}", self.instructions_retired);
            println!("insts_flushed            {}", self.instructions_flushed);
            println!("sim_ipc                  {ipc:.4}");
            println!("sim_cpi                  {cpi:.4}");
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let total_inst = instr as f64;
            println!("INSTRUCTION MIX");
            println!(
                "  op.alu                 {} ({:.2}%)",
                self.inst_alu,
                (self.inst_alu as f64 / total_inst) * 100.0
            );
            println!(
                "  op.load                {} ({:.2}%)",
                self.inst_load,
                (self.inst_load as f64 / total_inst) * 100.0
            );
            println!(
                "  op.store               {} ({:.2}%)",
                self.inst_store,
                (self.inst_store as f64 / total_inst) * 100.0
            );
            println!(
                "  op.branch              {} ({:.2}%)",
                self.inst_branch,
                (self.inst_branch as f64 / total_inst) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("hazards") {
            println!("HAZARD BREAKDOWN");
            println!(
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                (self.stalls_data as f64 / cyc as f64) * 100.0
            );
            println!(
                "  stalls.control         {} ({:.2}%)",
                self.stalls_control,
                (self.stalls_control as f64 / cyc as f64) * 100.0
            );
            println!(
                "  stalls.structural      {} ({:.2}%)",
                self.stalls_structural,
                (self.stalls_structural as f64 / cyc as f64) * 100.0
            );
            println!("  multi_hazard_cycles    {}", self.multi_hazard_cycles);
            println!("----------------------------------------------------------");
        }
        if want("branch") {
            let bp_correct = self.branch_predictions;
            let bp_miss = self.branch_mispredictions;
            let bp_total = bp_correct + bp_miss;
            let bp_acc = if bp_total > 0 {
                100.0 * (bp_correct as f64 / bp_total as f64)
            } else {
                0.0
            };
            println!("BRANCH PREDICTION (static not-taken)");
            println!("  bp.lookups             {bp_total}");
            println!("  bp.mispredicts         {bp_miss}");
            println!("  bp.accuracy            {bp_acc:.2}%");
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            let print_cache = |name: &str, hits: u64, misses: u64| {
                let total = hits + misses;
                let rate = if total > 0 {
                    (hits as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                println!(
                    "  {:<6} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                    name,
                    total,
                    hits,
                    100.0 - rate
                );
            };
            println!("MEMORY HIERARCHY");
            print_cache("L1-I", self.icache_hits, self.icache_misses);
            print_cache("L1-D", self.dcache_hits, self.dcache_misses);
            println!("  dcache evictions: {}", self.dcache_evictions);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
