use crate::error::MachineError;
use crate::machine::Machine;
use crate::operand::Args;

impl Machine {
    // Fallback for words no decoder row claims (and for the all-ones word
    // the catch-all row matches). Diagnose and keep going; machine state is
    // left exactly as the fetch left it.
    pub(crate) fn handle_unknown(&mut self, args: &Args) -> Result<(), MachineError> {
        log::warn!("unknown instruction word {:06o}", args.word());
        Ok(())
    }
}
