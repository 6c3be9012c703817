//! The classic warriors every Core War implementation ships for smoke
//! tests and demo battles.

use crate::instruction::AddressMode::{self, Direct, Immediate, Indirect};
use crate::instruction::{Instruction, Opcode};
use crate::warrior::Warrior;

fn inst(opcode: Opcode, a_mode: AddressMode, a: i64, b_mode: AddressMode, b: i64) -> Instruction {
    Instruction::new(opcode, a_mode, a, b_mode, b)
}

/// The Imp: a single `MOV $0, $1` crawling forward through the core one
/// cell per cycle, paving everything behind it with copies of itself.
pub fn imp() -> Warrior {
    Warrior::new("Imp", "Classic", vec![inst(Opcode::Mov, Direct, 0, Direct, 1)])
}

/// The Dwarf: bombs every fourth cell with `DAT` while sitting still.
pub fn dwarf() -> Warrior {
    Warrior::new(
        "Dwarf",
        "Classic",
        vec![
            inst(Opcode::Add, Immediate, 4, Direct, 3),
            inst(Opcode::Mov, Direct, 2, Indirect, 2),
            inst(Opcode::Jmp, Direct, -2, Direct, 0),
            inst(Opcode::Dat, Immediate, 0, Immediate, 0),
        ],
    )
}

/// Stone: a tighter bomber that throws from inside its own loop.
pub fn stone() -> Warrior {
    Warrior::new(
        "Stone",
        "Classic",
        vec![
            inst(Opcode::Mov, Indirect, 0, Indirect, 2),
            inst(Opcode::Add, Immediate, 2, Direct, -1),
            inst(Opcode::Jmp, Direct, -2, Direct, 0),
            inst(Opcode::Dat, Immediate, 0, Immediate, 2),
        ],
    )
}

/// Scanner: compares distant cells looking for an enemy, then attacks.
pub fn scanner() -> Warrior {
    Warrior::new(
        "Scanner",
        "Classic",
        vec![
            inst(Opcode::Cmp, Direct, 100, Direct, 200),
            inst(Opcode::Jmp, Direct, 4, Direct, 0),
            inst(Opcode::Add, Immediate, 1, Direct, -2),
            inst(Opcode::Add, Immediate, 1, Direct, -3),
            inst(Opcode::Jmp, Direct, -4, Direct, 0),
            inst(Opcode::Mov, Immediate, 0, Direct, 100),
        ],
    )
}
