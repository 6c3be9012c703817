//! Static pattern analysis of warrior programs.
//!
//! Everything here inspects only the instruction list a warrior was built
//! from; nothing touches a battle or the core. Useful for labelling
//! combatants in tournament output.

use std::collections::HashMap;

use crate::instruction::{Instruction, Opcode};

/// A code shape the analyzer recognizes. A program can match several.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// The one-instruction self-copier.
    Imp,
    /// Move + arithmetic + jump: throws something in a loop.
    Bomber,
    /// Compares cells looking for an enemy.
    Scanner,
    /// Forks new processes.
    Replicator,
    /// Mostly `DAT`: wipes core rather than computing.
    Clear,
    /// A short program that scans.
    QuickScan,
    /// The four-instruction optimized bomber shape.
    Stone,
    /// A replicator that also copies code around.
    Paper,
}

/// The analyzer's overall verdict, the most specific match winning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Unknown,
    Imp,
    Bomber,
    Scanner,
    Replicator,
    Clear,
    Stone,
    Paper,
}

/// What static analysis concluded about one program.
#[derive(Debug)]
pub struct Analysis {
    pub length: usize,
    pub histogram: HashMap<Opcode, usize>,
    pub patterns: Vec<Pattern>,
    pub strategy: Strategy,
}

/// Count how often each opcode appears.
pub fn opcode_histogram(program: &[Instruction]) -> HashMap<Opcode, usize> {
    let mut histogram = HashMap::new();
    for instruction in program {
        *histogram.entry(instruction.opcode).or_insert(0) += 1;
    }
    histogram
}

fn uses(histogram: &HashMap<Opcode, usize>, opcode: Opcode) -> bool {
    histogram.contains_key(&opcode)
}

/// Classify a program by the tactic its shape suggests.
///
/// Detectors run in a fixed order; the first one to match decides the
/// strategy, except that the `Stone` and `Paper` shapes are specific
/// enough to override an earlier verdict.
pub fn analyze(program: &[Instruction]) -> Analysis {
    let histogram = opcode_histogram(program);
    let mut patterns = Vec::new();
    let mut strategy = Strategy::Unknown;
    let length = program.len();

    if length == 1 {
        let instruction = &program[0];
        if instruction.opcode == Opcode::Mov && instruction.a_value == 0 && instruction.b_value == 1
        {
            patterns.push(Pattern::Imp);
            strategy = Strategy::Imp;
        }
    }

    if uses(&histogram, Opcode::Mov)
        && (uses(&histogram, Opcode::Add) || uses(&histogram, Opcode::Sub))
        && uses(&histogram, Opcode::Jmp)
    {
        patterns.push(Pattern::Bomber);
        if strategy == Strategy::Unknown {
            strategy = Strategy::Bomber;
        }
    }

    if uses(&histogram, Opcode::Cmp) || uses(&histogram, Opcode::Seq) || uses(&histogram, Opcode::Sne)
    {
        patterns.push(Pattern::Scanner);
        if strategy == Strategy::Unknown {
            strategy = Strategy::Scanner;
        }
    }

    if uses(&histogram, Opcode::Spl) {
        patterns.push(Pattern::Replicator);
        if strategy == Strategy::Unknown {
            strategy = Strategy::Replicator;
        }
    }

    if length > 0 {
        let dats = histogram.get(&Opcode::Dat).copied().unwrap_or(0);
        if dats as f64 / length as f64 > 0.3 {
            patterns.push(Pattern::Clear);
            if strategy == Strategy::Unknown {
                strategy = Strategy::Clear;
            }
        }
    }

    if length < 10 && (uses(&histogram, Opcode::Cmp) || uses(&histogram, Opcode::Seq)) {
        patterns.push(Pattern::QuickScan);
    }

    if length == 4 && uses(&histogram, Opcode::Mov) && uses(&histogram, Opcode::Add) {
        patterns.push(Pattern::Stone);
        strategy = Strategy::Stone;
    }

    if length > 5 && uses(&histogram, Opcode::Spl) && uses(&histogram, Opcode::Mov) {
        patterns.push(Pattern::Paper);
        strategy = Strategy::Paper;
    }

    Analysis {
        length,
        histogram,
        patterns,
        strategy,
    }
}
