use crate::error::MachineError;
use crate::machine::Machine;
use crate::operand::{Args, Width};

impl Machine {
    // CLR dd: zeroes the destination word.
    pub(crate) fn handle_clr(&mut self, args: &Args) -> Result<(), MachineError> {
        let dd = args.dd.expect("BUG: clr requires a destination operand");
        dd.write(self, 0, Width::Word)
    }
}
