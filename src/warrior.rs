use std::collections::VecDeque;
use std::fmt;

use crate::instruction::Instruction;

/// A competitor: an immutable program plus its live execution state.
///
/// `program` is the warrior's own record of what it loaded; the core holds
/// the live copy, which diverges as the battle proceeds. `processes` is a
/// FIFO queue of program counters, one per concurrently scheduled thread of
/// execution. A warrior is alive while the queue is non-empty; dead
/// warriors are never resurrected.
pub struct Warrior {
    pub name: String,
    pub author: String,
    pub program: Vec<Instruction>,
    /// Where the program was placed; meaningful only after loading.
    pub start_address: usize,
    pub processes: VecDeque<usize>,
}

impl Warrior {
    pub fn new(name: impl Into<String>, author: impl Into<String>, program: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            program,
            start_address: 0,
            processes: VecDeque::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.processes.is_empty()
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

impl fmt::Display for Warrior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {}, {} instructions",
            self.name,
            self.author,
            self.program.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{AddressMode, Opcode};

    #[test]
    fn test_new_warrior_is_dead() {
        let warrior = Warrior::new("Test", "Nobody", vec![]);
        assert!(!warrior.is_alive());
        assert_eq!(warrior.process_count(), 0);
    }

    #[test]
    fn test_display() {
        let program = vec![Instruction::new(
            Opcode::Mov,
            AddressMode::Direct,
            0,
            AddressMode::Direct,
            1,
        )];
        let warrior = Warrior::new("Imp", "Classic", program);
        assert_eq!(warrior.to_string(), "Imp by Classic, 1 instructions");
    }
}
