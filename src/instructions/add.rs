use crate::error::MachineError;
use crate::machine::Machine;
use crate::operand::{Args, Width};

impl Machine {
    // ADD ss, dd: sums both operand words into the destination. Overflow is
    // truncated to 16 bits; nothing records the carry in this subset.
    pub(crate) fn handle_add(&mut self, args: &Args) -> Result<(), MachineError> {
        let ss = args.ss.expect("BUG: add requires a source operand");
        let dd = args.dd.expect("BUG: add requires a destination operand");
        dd.write(self, ss.value.wrapping_add(dd.value), Width::Word)
    }
}
