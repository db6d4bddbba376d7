use crate::error::MachineError;
use crate::operand::{Args, Param};

// The PDP-11 has a 16 bit address space, so the machine owns a flat 64KB of
// byte-addressable memory. Words are stored little-endian: low byte at the
// even address, high byte right above it.
pub const MEMSIZE: usize = 64 * 1024;

// Index of the program counter in the register file. R6 is the stack pointer
// by convention; nothing in the current instruction subset touches it.
pub const PC: usize = 7;
pub const SP: usize = 6;

// Where execution begins. The object-file format carries no entry point, so
// every program starts at octal 1000.
pub const START_ADDRESS: u16 = 0o1000;

#[derive(Debug)]
pub struct Machine {
    // Eight 16 bit general registers r0..r7. r7 doubles as the program
    // counter, which is why addressing modes that consume instruction-stream
    // words express themselves as plain register side effects on reg[7].
    pub reg: [u16; 8],

    // Set by the HALT handler; the run loop stops before the next fetch.
    pub halted: bool,

    mem: [u8; MEMSIZE],
}

// One row of the decode table. A fetched word belongs to the first row whose
// masked bits equal `opcode`; `params` names the operand fields to resolve
// before `handler` runs.
pub(crate) struct Command {
    pub mask: u16,
    pub opcode: u16,
    pub name: &'static str,
    pub params: &'static [Param],
    pub handler: fn(&mut Machine, &Args) -> Result<(), MachineError>,
}

// Scanned in declared order; first match wins. The final row is the
// catch-all: mask and opcode are both all ones, so it can only ever match
// the word 0o177777 itself. Anything that falls through the whole table is
// routed to the same unknown handler by `decode`.
pub(crate) static COMMANDS: [Command; 6] = [
    Command { mask: 0o177777, opcode: 0o000000, name: "halt", params: &[], handler: Machine::handle_halt },
    Command { mask: 0o170000, opcode: 0o010000, name: "mov", params: &[Param::Ss, Param::Dd], handler: Machine::handle_mov },
    Command { mask: 0o170000, opcode: 0o060000, name: "add", params: &[Param::Ss, Param::Dd], handler: Machine::handle_add },
    Command { mask: 0o177000, opcode: 0o005000, name: "clr", params: &[Param::Dd], handler: Machine::handle_clr },
    Command { mask: 0o177000, opcode: 0o077000, name: "sob", params: &[Param::R, Param::Nn], handler: Machine::handle_sob },
    Command { mask: 0o177777, opcode: 0o177777, name: "unknown", params: &[], handler: Machine::handle_unknown },
];

static UNMATCHED: Command = Command {
    mask: 0,
    opcode: 0,
    name: "unknown",
    params: &[],
    handler: Machine::handle_unknown,
};

pub(crate) fn decode(word: u16) -> &'static Command {
    COMMANDS
        .iter()
        .find(|cmd| word & cmd.mask == cmd.opcode)
        .unwrap_or(&UNMATCHED)
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            reg: [0; 8],
            halted: false,
            mem: [0; MEMSIZE],
        }
    }

    pub fn b_read(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    pub fn b_write(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }

    // Words are little-endian: low byte at addr, high byte at addr + 1.
    // Word access to an odd address is a hard fault on the real machine and
    // a fatal error here.
    pub fn w_read(&self, addr: u16) -> Result<u16, MachineError> {
        if addr % 2 != 0 {
            return Err(MachineError::UnalignedAddress(addr));
        }
        Ok(u16::from_le_bytes([
            self.b_read(addr),
            self.b_read(addr + 1),
        ]))
    }

    pub fn w_write(&mut self, addr: u16, value: u16) -> Result<(), MachineError> {
        if addr % 2 != 0 {
            return Err(MachineError::UnalignedAddress(addr));
        }
        let [low, high] = value.to_le_bytes();
        self.b_write(addr, low);
        self.b_write(addr + 1, high);
        Ok(())
    }

    // Executes exactly one instruction: fetch the word at the program
    // counter, advance past it, decode, resolve operands, dispatch.
    //
    // The fetch happens before operand resolution on purpose: modes 2/3 with
    // r7 and modes 6/7 consume extension words by bumping reg[7] while they
    // resolve, so by the time the handler runs the program counter already
    // points past the whole instruction.
    pub fn step(&mut self) -> Result<(), MachineError> {
        let pc = self.reg[PC];
        let word = self.w_read(pc)?;
        self.reg[PC] = pc.wrapping_add(2);

        let cmd = decode(word);
        let args = Args::resolve(self, cmd.params, word)?;
        println!("{:06o}: {}{}", pc, cmd.name, args.disassembly());

        (cmd.handler)(self, &args)
    }

    pub fn run(&mut self) -> Result<(), MachineError> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    // The two-line dump printed on HALT: even registers then odd registers,
    // with r6/r7 under their conventional names.
    pub fn register_dump(&self) -> String {
        format!(
            "r0={:06o} r2={:06o} r4={:06o} sp={:06o}\nr1={:06o} r3={:06o} r5={:06o} pc={:06o}",
            self.reg[0], self.reg[2], self.reg[4], self.reg[6],
            self.reg[1], self.reg[3], self.reg[5], self.reg[7],
        )
    }

    // Word-by-word view of a memory range, one line per word: address and
    // contents in octal, contents again in hex.
    pub fn mem_dump(&self, address: u16, size: u16) -> Result<String, MachineError> {
        let mut lines = Vec::new();
        let mut offset = 0;
        while offset < size {
            let addr = address.wrapping_add(offset);
            let word = self.w_read(addr)?;
            lines.push(format!("{:06o}: {:06o} {:04x}", addr, word, word));
            offset += 2;
        }
        Ok(lines.join("\n"))
    }
}

impl Default for Machine {
    fn default() -> Machine {
        Machine::new()
    }
}
