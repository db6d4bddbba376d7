use crate::error::MachineError;
use crate::machine::{Machine, PC};

// Operand fields an instruction can carry, in the order they are resolved.
// Two-operand instructions list Ss before Dd; source side effects land
// before the destination is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Param {
    Ss, // 6 bit source field, bits 11..6
    Dd, // 6 bit destination field, bits 5..0
    R,  // 3 bit register number, bits 8..6
    Nn, // 6 bit unsigned displacement, bits 5..0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Word,
    Byte,
}

// Where a resolved operand lives. Register operands write back into the
// register file, memory operands through the regular word/byte stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(usize),
    Memory(u16),
}

// A resolved operand: the location the addressing mode landed on, plus the
// value that was read from it at resolution time. Side effects of the mode
// (auto-increment, auto-decrement, extension-word consumption through r7)
// have already been applied by the time an Operand exists.
#[derive(Debug, Clone, Copy)]
pub struct Operand {
    pub location: Location,
    pub value: u16,
}

impl Operand {
    pub fn write(&self, machine: &mut Machine, value: u16, width: Width) -> Result<(), MachineError> {
        match (self.location, width) {
            (Location::Register(r), _) => {
                machine.reg[r] = value;
                Ok(())
            }
            (Location::Memory(addr), Width::Word) => machine.w_write(addr, value),
            (Location::Memory(addr), Width::Byte) => {
                machine.b_write(addr, value as u8);
                Ok(())
            }
        }
    }
}

// The operand fields of one decoded instruction, resolved and ready for the
// handler, plus the disassembly text collected along the way.
#[derive(Debug)]
pub struct Args {
    pub(crate) word: u16,
    pub ss: Option<Operand>,
    pub dd: Option<Operand>,
    pub r: Option<usize>,
    pub nn: Option<u16>,
    pub(crate) text: Vec<String>,
}

impl Args {
    pub(crate) fn resolve(
        machine: &mut Machine,
        params: &[Param],
        word: u16,
    ) -> Result<Args, MachineError> {
        let mut args = Args {
            word,
            ss: None,
            dd: None,
            r: None,
            nn: None,
            text: Vec::new(),
        };

        for param in params {
            match param {
                Param::Ss => {
                    args.ss = Some(resolve_field(machine, (word >> 6) & 0o77, &mut args.text)?);
                }
                Param::Dd => {
                    args.dd = Some(resolve_field(machine, word & 0o77, &mut args.text)?);
                }
                Param::R => {
                    let r = ((word >> 6) & 0o7) as usize;
                    args.text.push(format!("r{}", r));
                    args.r = Some(r);
                }
                Param::Nn => {
                    let nn = word & 0o77;
                    args.text.push(format!("{:o}", nn));
                    args.nn = Some(nn);
                }
            }
        }

        Ok(args)
    }

    pub fn word(&self) -> u16 {
        self.word
    }

    // Operand text for the trace line, with a leading space so instructions
    // without operands print cleanly.
    pub(crate) fn disassembly(&self) -> String {
        if self.text.is_empty() {
            String::new()
        } else {
            format!(" {}", self.text.join(" "))
        }
    }
}

// Resolves one 6 bit mode-and-register field into an Operand, applying the
// side effects of the addressing mode as it goes. The value is always read
// here, at resolution time, so a destination operand observes memory and
// registers as the source's resolution left them.
fn resolve_field(
    machine: &mut Machine,
    field: u16,
    text: &mut Vec<String>,
) -> Result<Operand, MachineError> {
    let r = (field & 0o7) as usize;
    let mode = (field >> 3) & 0o7;

    match mode {
        // Register: the operand is the register itself
        0 => {
            text.push(format!("r{}", r));
            Ok(Operand {
                location: Location::Register(r),
                value: machine.reg[r],
            })
        }

        // Register deferred: the register holds the address
        1 => {
            let addr = machine.reg[r];
            let value = machine.w_read(addr)?;
            text.push(format!("(r{})", r));
            Ok(Operand {
                location: Location::Memory(addr),
                value,
            })
        }

        // Autoincrement: read through the register, then step it by a word.
        // With r7 this is immediate addressing: the "pointed-to" word is the
        // next instruction-stream word and the step skips the PC past it.
        2 => {
            let addr = machine.reg[r];
            let value = machine.w_read(addr)?;
            if r == PC {
                text.push(format!("#{:06o}", value));
            } else {
                text.push(format!("(r{})+", r));
            }
            machine.reg[r] = machine.reg[r].wrapping_add(2);
            Ok(Operand {
                location: Location::Memory(addr),
                value,
            })
        }

        // Autoincrement deferred: the register points at a pointer
        3 => {
            let addr = machine.reg[r];
            let ptr = machine.w_read(addr)?;
            let value = machine.w_read(ptr)?;
            machine.reg[r] = machine.reg[r].wrapping_add(2);
            text.push(format!("@(r{})+", r));
            Ok(Operand {
                location: Location::Memory(ptr),
                value,
            })
        }

        // Autodecrement: step the register back a word, then read through it
        4 => {
            machine.reg[r] = machine.reg[r].wrapping_sub(2);
            let addr = machine.reg[r];
            let value = machine.w_read(addr)?;
            text.push(format!("-(r{})", r));
            Ok(Operand {
                location: Location::Memory(addr),
                value,
            })
        }

        // Autodecrement deferred
        5 => {
            machine.reg[r] = machine.reg[r].wrapping_sub(2);
            let addr = machine.reg[r];
            let ptr = machine.w_read(addr)?;
            let value = machine.w_read(ptr)?;
            text.push(format!("@-(r{})", r));
            Ok(Operand {
                location: Location::Memory(ptr),
                value,
            })
        }

        // Index: the next instruction-stream word is an offset added to the
        // register. Consuming it moves r7 past the extension word.
        6 => {
            let offset = machine.w_read(machine.reg[PC])?;
            machine.reg[PC] = machine.reg[PC].wrapping_add(2);
            let addr = machine.reg[r].wrapping_add(offset);
            let value = machine.w_read(addr)?;
            text.push(format!("{}(r{})", offset, r));
            Ok(Operand {
                location: Location::Memory(addr),
                value,
            })
        }

        // Index deferred: register plus offset selects a pointer
        7 => {
            let offset = machine.w_read(machine.reg[PC])?;
            machine.reg[PC] = machine.reg[PC].wrapping_add(2);
            let ptr = machine.reg[r].wrapping_add(offset);
            let addr = machine.w_read(ptr)?;
            let value = machine.w_read(addr)?;
            text.push(format!("@{}(r{})", offset, r));
            Ok(Operand {
                location: Location::Memory(addr),
                value,
            })
        }

        // The mode field is 3 bits wide
        _ => unreachable!("addressing mode {} out of range", mode),
    }
}
