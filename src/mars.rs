use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::core::Core;
use crate::warrior::Warrior;

/// How many start addresses the random placer samples before giving up.
const PLACEMENT_ATTEMPTS: usize = 1000;

/// Battle parameters.
pub struct MarsConfig {
    /// Number of cells in the circular core.
    pub core_size: usize,
    /// Cycle budget before the battle is called a draw.
    pub max_cycles: usize,
    /// Per-warrior process cap; only `SPL` can grow the count.
    pub max_processes: usize,
    /// Longest program a warrior may load.
    pub max_length: usize,
}

impl Default for MarsConfig {
    fn default() -> Self {
        Self {
            core_size: 8000,
            max_cycles: 80000,
            max_processes: 8000,
            max_length: 100,
        }
    }
}

/// Why a warrior could not be placed into the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("program has {len} instructions, limit is {max}")]
    ProgramTooLong { len: usize, max: usize },

    #[error("program of {len} instructions does not fit in a core of {core_size} cells")]
    DoesNotFit { len: usize, core_size: usize },

    #[error("no start address satisfied the separation constraint after {attempts} attempts")]
    SeparationUnsatisfiable { attempts: usize },
}

/// Ownership tag for one core cell, as seen by an external renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellTag {
    /// Nothing known to live here.
    Empty,
    /// Inside a warrior's original program footprint and not the sentinel.
    Code(usize),
    /// A live program counter of the given warrior.
    Process(usize),
}

/// One battle: the core, the combatants, and the clock.
///
/// A battle owns all of its state, so any number of battles can run in
/// parallel without coordination. Scheduling is cooperative round-robin:
/// each cycle every alive warrior executes exactly one instruction, in
/// load order, FIFO over its own process queue. Together with the
/// placement seed this makes the entire battle deterministic.
pub struct Mars {
    config: MarsConfig,
    core: Core,
    warriors: Vec<Warrior>,
    cycle: usize,
    winner: Option<usize>,
    rng: SmallRng,
}

impl Mars {
    /// Create a battle with an empty, sentinel-filled core. The seed drives
    /// randomized warrior placement and nothing else.
    pub fn new(config: MarsConfig, seed: u64) -> Self {
        let core = Core::new(config.core_size);
        Self {
            config,
            core,
            warriors: Vec::new(),
            cycle: 0,
            winner: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MarsConfig {
        &self.config
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn warriors(&self) -> &[Warrior] {
        &self.warriors
    }

    /// Cycles executed so far.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn winner(&self) -> Option<&Warrior> {
        self.winner.map(|index| &self.warriors[index])
    }

    /// Load-order index of the winner, usable as a stable identity even
    /// when two combatants share a name.
    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    /// Place a warrior's program into the core and start one process at its
    /// first instruction.
    ///
    /// With an explicit `address` the program is copied there unchecked
    /// against other warriors (callers control their own spacing). Without
    /// one, a start address is sampled uniformly from
    /// `[0, core_size - len)` until it is at least
    /// `core_size / (loaded + 1)` away from every earlier warrior's start,
    /// measured as absolute index distance. The search is bounded; a core
    /// too crowded to satisfy the constraint reports
    /// [`PlacementError::SeparationUnsatisfiable`] instead of stalling.
    pub fn load_warrior(
        &mut self,
        mut warrior: Warrior,
        address: Option<usize>,
    ) -> Result<(), PlacementError> {
        let len = warrior.program.len();
        if len > self.config.max_length {
            return Err(PlacementError::ProgramTooLong {
                len,
                max: self.config.max_length,
            });
        }
        if len > self.config.core_size {
            return Err(PlacementError::DoesNotFit {
                len,
                core_size: self.config.core_size,
            });
        }

        let start = match address {
            Some(address) => self.core.normalize(address as i64),
            None => self.place_randomly(len)?,
        };

        warrior.start_address = start;
        warrior.processes.clear();
        warrior.processes.push_back(start);

        for (offset, instruction) in warrior.program.iter().enumerate() {
            let cell = self.core.normalize((start + offset) as i64);
            *self.core.cell_mut(cell) = *instruction;
        }

        self.warriors.push(warrior);
        Ok(())
    }

    fn place_randomly(&mut self, len: usize) -> Result<usize, PlacementError> {
        let core_size = self.config.core_size;
        if len >= core_size {
            return Err(PlacementError::DoesNotFit { len, core_size });
        }
        let min_separation = core_size / (self.warriors.len() + 1);
        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidate = self.rng.gen_range(0..core_size - len);
            let separated = self
                .warriors
                .iter()
                .all(|other| candidate.abs_diff(other.start_address) >= min_separation);
            if separated {
                return Ok(candidate);
            }
        }
        Err(PlacementError::SeparationUnsatisfiable {
            attempts: PLACEMENT_ATTEMPTS,
        })
    }

    /// Advance the battle by one cycle. Returns false once the battle is
    /// over: cycle budget exhausted, or at most one warrior left alive
    /// (the sole survivor, if any, becomes the winner).
    pub fn run_cycle(&mut self) -> bool {
        let mut alive = 0;
        let mut last_alive = None;
        for (index, warrior) in self.warriors.iter().enumerate() {
            if warrior.is_alive() {
                alive += 1;
                last_alive = Some(index);
            }
        }
        if alive <= 1 {
            self.winner = last_alive;
            return false;
        }

        if self.cycle >= self.config.max_cycles {
            return false;
        }

        for index in 0..self.warriors.len() {
            let Some(pc) = self.warriors[index].processes.pop_front() else {
                continue;
            };
            let live = self.warriors[index].processes.len() + 1;
            let successors = self.core.execute(pc, live, self.config.max_processes);
            for successor in successors.iter() {
                self.warriors[index].processes.push_back(successor);
            }
        }

        self.cycle += 1;
        true
    }

    /// Run cycles until the battle reaches its terminal state. Returns the
    /// winner, or `None` for a draw.
    pub fn run_battle(&mut self) -> Option<&Warrior> {
        while self.run_cycle() {}
        self.winner()
    }

    /// Snapshot core ownership for an external renderer. Read-only.
    ///
    /// Per warrior, in load order: cells of the original program footprint
    /// that differ from the sentinel are tagged as code, then each live
    /// process PC is tagged on top. Later warriors override earlier tags.
    pub fn memory_state(&self) -> Vec<CellTag> {
        let mut state = vec![CellTag::Empty; self.config.core_size];
        for (index, warrior) in self.warriors.iter().enumerate() {
            for offset in 0..warrior.program.len() {
                let cell = self.core.normalize((warrior.start_address + offset) as i64);
                if !self.core.cell(cell).is_sentinel() {
                    state[cell] = CellTag::Code(index);
                }
            }
            for &pc in &warrior.processes {
                state[pc] = CellTag::Process(index);
            }
        }
        state
    }
}
