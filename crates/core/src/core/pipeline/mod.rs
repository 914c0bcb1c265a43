//! The five-stage pipeline controller.
//!
//! [`Pipeline`] owns every functional unit and advances the machine one
//! clock edge per [`Pipeline::step`]. Within a cycle the memory hierarchy
//! clocks first, then the stage procedures run in reverse pipeline order
//! (writeback, memory, execute, decode, fetch) so each stage observes the
//! state the previous cycle left in its upstream latch before anything
//! overwrites it. Latches whose boundary is not stalled clock afterwards,
//! and all hazard and bypass wire state resets for the next cycle.

pub mod latches;
pub mod snapshot;
pub mod stages;

use tracing::debug;

use crate::common::SimError;
use crate::config::Config;
use crate::core::units::{ForwardingUnit, HazardUnit, RegisterFile};
use crate::mem::{MemoryImage, MemoryUnit};
use crate::stats::SimStats;

pub use latches::{Latch, Latches};
pub use snapshot::{CycleSnapshot, StageSnapshot};

/// Why a [`Pipeline::run`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The pipeline drained: no instruction in flight and fetch idle on an
    /// empty word.
    Drained,
    /// The cycle budget ran out first.
    CycleBudget,
}

/// Persistent fetch-stage state across cycles.
#[derive(Default)]
pub(crate) struct FetchState {
    /// Next fetch address.
    pub pc: u32,
    /// An instruction-cache request is in flight.
    pub awaiting: bool,
}

/// Persistent memory-stage state across the beats of one wide access.
#[derive(Default)]
pub(crate) struct MemState {
    /// A data-cache request is in flight for the current beat.
    pub awaiting: bool,
    /// Beats completed so far for the access in progress.
    pub beats_done: u32,
    /// Load data accumulated across beats, low beat first.
    pub value: u32,
}

/// The pipelined core.
pub struct Pipeline {
    pub(crate) mem: MemoryUnit,
    pub(crate) rf: RegisterFile,
    pub(crate) hazards: HazardUnit,
    pub(crate) forwarding: ForwardingUnit,
    pub(crate) latches: Latches,
    pub(crate) fetch_state: FetchState,
    pub(crate) mem_state: MemState,
    /// Memory-stage beat width in bytes for wide loads and stores.
    pub(crate) mem_beat_bytes: u32,
    pub(crate) stats: SimStats,
    pub(crate) snapshot: CycleSnapshot,
    /// Any stage saw work this cycle, or fetch has a request in flight.
    pub(crate) pipe_active: bool,
}

impl Pipeline {
    /// Builds a core around a loaded memory image, starting fetch at
    /// `entry`.
    ///
    /// Boot seeding matches the modeled machine: `sp` points at the top of
    /// the image and `ra` and `s0`-`s3` are marked valid so common
    /// function prologues do not trip the invalid-register check.
    pub fn new(image: MemoryImage, entry: u32, config: &Config) -> Self {
        let mem = MemoryUnit::new(image, config);
        let mut rf = RegisterFile::new();
        rf.set_stack_pointer(mem.stack_pointer());
        for reg in [
            crate::common::Reg::RA,
            crate::common::Reg::S0,
            crate::common::Reg::S1,
            crate::common::Reg::S2,
            crate::common::Reg::S3,
        ] {
            rf.validate(reg);
        }
        Self {
            mem,
            rf,
            hazards: HazardUnit::new(),
            forwarding: ForwardingUnit::default(),
            latches: Latches::default(),
            fetch_state: FetchState {
                pc: entry,
                awaiting: false,
            },
            mem_state: MemState::default(),
            mem_beat_bytes: config.memory.beat_bytes,
            stats: SimStats::default(),
            snapshot: CycleSnapshot::default(),
            pipe_active: false,
        }
    }

    /// Advances the machine by exactly one clock edge.
    ///
    /// # Errors
    ///
    /// Any fatal failure (decode, invalid register read, out-of-range
    /// access) aborts the step, wrapped with the cycle at which it surfaced.
    pub fn step(&mut self) -> Result<(), SimError> {
        let cycle = self.stats.cycles;
        self.step_inner().map_err(|e| e.at_cycle(cycle))
    }

    fn step_inner(&mut self) -> Result<(), SimError> {
        self.pipe_active = false;
        self.snapshot.reset(self.stats.cycles);

        self.mem.clock()?;

        stages::writeback::run(self);
        stages::memory::run(self)?;
        stages::execute::run(self);
        stages::decode::run(self)?;
        stages::fetch::run(self)?;

        self.update_hazard_stats();

        if !self.hazards.fd_stall {
            self.latches.fetch_decode.clock();
        }
        if !self.hazards.de_stall {
            self.latches.decode_execute.clock();
        }
        if !self.hazards.em_stall {
            self.latches.execute_memory.clock();
        }
        self.latches.memory_writeback.clock();

        self.hazards.reset();
        self.forwarding.flush();
        self.sync_cache_stats();
        self.stats.cycles += 1;
        Ok(())
    }

    /// Steps until the pipeline drains or `max_cycles` elapse.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal error from [`Self::step`].
    pub fn run(&mut self, max_cycles: u64) -> Result<StopReason, SimError> {
        for _ in 0..max_cycles {
            self.step()?;
            if self.is_drained() {
                debug!(cycles = self.stats.cycles, "pipeline drained");
                return Ok(StopReason::Drained);
            }
        }
        Ok(StopReason::CycleBudget)
    }

    /// Whether the last cycle found nothing in flight anywhere.
    pub fn is_drained(&self) -> bool {
        !self.pipe_active && self.latches.all_empty() && !self.fetch_state.awaiting
    }

    /// End-of-run counters.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The architectural register file.
    pub fn register_file(&self) -> &RegisterFile {
        &self.rf
    }

    /// The latest per-cycle stage snapshot row.
    pub fn snapshot(&self) -> &CycleSnapshot {
        &self.snapshot
    }

    /// The pipeline latches, for latch-discipline assertions.
    pub fn latches(&self) -> &Latches {
        &self.latches
    }

    /// Next fetch address.
    pub fn pc(&self) -> u32 {
        self.fetch_state.pc
    }

    /// Folds this cycle's hazard activity into the counters.
    ///
    /// A cycle with more than one distinct hazard kind counts once as a
    /// multi-hazard cycle instead of inflating each individual counter; the
    /// flush penalty shrinks accordingly because the overlapping stall
    /// already covers part of it.
    fn update_hazard_stats(&mut self) {
        if self.hazards.active_hazards() > 1 {
            self.stats.multi_hazard_cycles += 1;
            if self.hazards.mispredict {
                self.stats.stalls_control += 2;
            }
        } else {
            if self.hazards.fetch_stall || self.hazards.memory_stall {
                self.stats.stalls_structural += 1;
            }
            if self.hazards.data_stall {
                self.stats.stalls_data += 1;
            }
            if self.hazards.mispredict {
                self.stats.stalls_control += 3;
            }
        }
    }

    fn sync_cache_stats(&mut self) {
        let (ih, im) = self.mem.icache_stats();
        let (dh, dm, de) = self.mem.dcache_stats();
        self.stats.icache_hits = ih;
        self.stats.icache_misses = im;
        self.stats.dcache_hits = dh;
        self.stats.dcache_misses = dm;
        self.stats.dcache_evictions = de;
    }
}
