use crate::error::MachineError;
use crate::machine::Machine;
use crate::operand::{Args, Width};

impl Machine {
    // MOV ss, dd: copies the source word into the destination. This subset
    // does not maintain condition codes, so a move is nothing but the copy.
    pub(crate) fn handle_mov(&mut self, args: &Args) -> Result<(), MachineError> {
        let ss = args.ss.expect("BUG: mov requires a source operand");
        let dd = args.dd.expect("BUG: mov requires a destination operand");
        dd.write(self, ss.value, Width::Word)
    }
}
