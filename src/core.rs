use crate::instruction::{AddressMode, Instruction, Opcode};

/// The shared circular memory all warriors execute in and fight over.
///
/// A core is a fixed-length array of instruction cells, every one of them
/// initialized to the `DAT #0, #0` sentinel. Cells are reached strictly by
/// index; the indirect addressing modes perform their read-modify-write on
/// one specific pointer cell, so two operands resolving to the same cell
/// observe a single consistent mutation order (A resolves before B, and
/// operand values are read only after both have resolved).
pub struct Core {
    cells: Vec<Instruction>,
}

/// The successor program counters produced by one instruction: none for a
/// terminating `DAT`, one for everything else, two for a granted `SPL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Successors {
    pcs: [usize; 2],
    len: u8,
}

impl Successors {
    fn none() -> Self {
        Self::default()
    }

    fn one(pc: usize) -> Self {
        Self { pcs: [pc, 0], len: 1 }
    }

    fn two(first: usize, second: usize) -> Self {
        Self { pcs: [first, second], len: 2 }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.pcs[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Flooring division: the quotient rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q.wrapping_sub(1)
    } else {
        q
    }
}

/// Floor modulo: the remainder carries the divisor's sign.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r.wrapping_add(b)
    } else {
        r
    }
}

impl Core {
    /// Create a core of `size` sentinel cells. `size` must be non-zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "core size must be non-zero");
        Self {
            cells: vec![Instruction::default(); size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Map any offset into `[0, len)`. The result is non-negative even for
    /// negative offsets, so out-of-bounds addressing is impossible.
    pub fn normalize(&self, address: i64) -> usize {
        address.rem_euclid(self.cells.len() as i64) as usize
    }

    pub fn cell(&self, index: usize) -> &Instruction {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut Instruction {
        &mut self.cells[index]
    }

    /// Resolve one operand to a cell index.
    ///
    /// `Immediate` returns `base` itself; the caller must treat the operand
    /// as a literal. The pre-decrement and post-increment modes mutate the
    /// pointer cell's `b_value` in place: pre-decrement writes before
    /// computing the target, post-increment computes the target from the
    /// old value and writes afterwards.
    pub fn resolve(&mut self, base: usize, mode: AddressMode, value: i64) -> usize {
        match mode {
            AddressMode::Immediate => base,
            AddressMode::Direct => self.normalize((base as i64).wrapping_add(value)),
            AddressMode::Indirect => {
                let pointer = self.normalize((base as i64).wrapping_add(value));
                let offset = self.cells[pointer].b_value;
                self.normalize((pointer as i64).wrapping_add(offset))
            }
            AddressMode::Predecrement => {
                let pointer = self.normalize((base as i64).wrapping_add(value));
                let cell = &mut self.cells[pointer];
                cell.b_value = cell.b_value.wrapping_sub(1);
                let offset = cell.b_value;
                self.normalize((pointer as i64).wrapping_add(offset))
            }
            AddressMode::Postincrement => {
                let pointer = self.normalize((base as i64).wrapping_add(value));
                let offset = self.cells[pointer].b_value;
                let target = self.normalize((pointer as i64).wrapping_add(offset));
                self.cells[pointer].b_value = offset.wrapping_add(1);
                target
            }
        }
    }

    /// Execute the instruction at `pc` and return its successor program
    /// counters, all normalized.
    ///
    /// `live_processes` is the executing warrior's process count including
    /// the process running this instruction; `SPL` grants a fork only while
    /// it is below `max_processes`, so the count never exceeds the cap.
    pub fn execute(&mut self, pc: usize, live_processes: usize, max_processes: usize) -> Successors {
        let opcode = self.cells[pc].opcode;
        let a_mode = self.cells[pc].a_mode;
        let b_mode = self.cells[pc].b_mode;

        // Resolution can write through to the executing cell's own b_value
        // (a pointer operand may land on pc), so the B operand and both
        // values are re-read from the core rather than from a stale copy.
        let a_addr = self.resolve(pc, a_mode, self.cells[pc].a_value);
        let b_addr = self.resolve(pc, b_mode, self.cells[pc].b_value);

        let a_val = if a_mode == AddressMode::Immediate {
            self.cells[pc].a_value
        } else {
            self.cells[a_addr].b_value
        };
        let b_val = if b_mode == AddressMode::Immediate {
            self.cells[pc].b_value
        } else {
            self.cells[b_addr].b_value
        };

        let next = self.normalize(pc as i64 + 1);
        let skip = self.normalize(pc as i64 + 2);

        match opcode {
            Opcode::Dat => Successors::none(),
            Opcode::Mov => {
                if a_mode == AddressMode::Immediate {
                    self.cells[b_addr].b_value = a_val;
                } else {
                    self.cells[b_addr] = self.cells[a_addr];
                }
                Successors::one(next)
            }
            Opcode::Add => {
                let cell = &mut self.cells[b_addr];
                cell.b_value = cell.b_value.wrapping_add(a_val);
                Successors::one(next)
            }
            Opcode::Sub => {
                let cell = &mut self.cells[b_addr];
                cell.b_value = cell.b_value.wrapping_sub(a_val);
                Successors::one(next)
            }
            Opcode::Mul => {
                let cell = &mut self.cells[b_addr];
                cell.b_value = cell.b_value.wrapping_mul(a_val);
                Successors::one(next)
            }
            Opcode::Div => {
                if a_val != 0 {
                    let cell = &mut self.cells[b_addr];
                    cell.b_value = floor_div(cell.b_value, a_val);
                }
                Successors::one(next)
            }
            Opcode::Mod => {
                if a_val != 0 {
                    let cell = &mut self.cells[b_addr];
                    cell.b_value = floor_mod(cell.b_value, a_val);
                }
                Successors::one(next)
            }
            Opcode::Jmp => Successors::one(a_addr),
            Opcode::Jmz => Successors::one(if b_val == 0 { a_addr } else { next }),
            Opcode::Jmn => Successors::one(if b_val != 0 { a_addr } else { next }),
            Opcode::Djn => {
                let cell = &mut self.cells[b_addr];
                cell.b_value = cell.b_value.wrapping_sub(1);
                let taken = cell.b_value != 0;
                Successors::one(if taken { a_addr } else { next })
            }
            Opcode::Cmp | Opcode::Seq => Successors::one(if a_val == b_val { skip } else { next }),
            Opcode::Sne => Successors::one(if a_val != b_val { skip } else { next }),
            Opcode::Slt => Successors::one(if a_val < b_val { skip } else { next }),
            Opcode::Spl => {
                if live_processes < max_processes {
                    Successors::two(next, a_addr)
                } else {
                    Successors::one(next)
                }
            }
            Opcode::Nop => Successors::one(next),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const OPCODES: &[Opcode] = &[
        Opcode::Dat,
        Opcode::Mov,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Mod,
        Opcode::Jmp,
        Opcode::Jmz,
        Opcode::Jmn,
        Opcode::Djn,
        Opcode::Cmp,
        Opcode::Seq,
        Opcode::Sne,
        Opcode::Slt,
        Opcode::Spl,
        Opcode::Nop,
    ];

    const MODES: &[AddressMode] = &[
        AddressMode::Immediate,
        AddressMode::Direct,
        AddressMode::Indirect,
        AddressMode::Predecrement,
        AddressMode::Postincrement,
    ];

    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (
            prop::sample::select(OPCODES),
            prop::sample::select(MODES),
            any::<i64>(),
            prop::sample::select(MODES),
            any::<i64>(),
        )
            .prop_map(|(opcode, a_mode, a, b_mode, b)| {
                Instruction::new(opcode, a_mode, a, b_mode, b)
            })
    }

    proptest! {
        #[test]
        fn resolve_stays_in_bounds(
            size in 1usize..512,
            base in any::<usize>(),
            mode in prop::sample::select(MODES),
            value in any::<i64>(),
            offset in any::<i64>(),
        ) {
            let mut core = Core::new(size);
            let base = base % size;
            core.cell_mut(base).b_value = offset;
            let resolved = core.resolve(base, mode, value);
            prop_assert!(resolved < size);
        }

        #[test]
        fn execute_successors_stay_in_bounds(
            cells in prop::collection::vec(arb_instruction(), 1..64),
            pc in any::<usize>(),
            live in 0usize..16,
            cap in 1usize..16,
        ) {
            let size = cells.len();
            let mut core = Core::new(size);
            for (index, cell) in cells.into_iter().enumerate() {
                *core.cell_mut(index) = cell;
            }
            let succ = core.execute(pc % size, live, cap);
            prop_assert!(succ.len() <= 2);
            for pc in succ.iter() {
                prop_assert!(pc < size);
            }
        }

        #[test]
        fn floor_div_matches_floor(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(b != 0);
            prop_assume!(!(a == i64::MIN && b == -1));
            let expected = (a as f64 / b as f64).floor();
            // Compare only where f64 is exact.
            if a.unsigned_abs() < (1 << 52) && b.unsigned_abs() < (1 << 52) {
                prop_assert_eq!(floor_div(a, b), expected as i64);
            }
            let (q, r) = (floor_div(a, b), floor_mod(a, b));
            prop_assert_eq!(q.wrapping_mul(b).wrapping_add(r), a);
        }
    }
}
