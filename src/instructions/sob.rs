use crate::error::MachineError;
use crate::machine::{Machine, PC};
use crate::operand::Args;

impl Machine {
    // SOB r, nn: subtract one and branch. Decrements the register and, while
    // it stays nonzero, moves the program counter back by nn words. The
    // displacement is an unsigned 6 bit count and the branch only ever goes
    // backward, which is what makes SOB a loop-closing instruction.
    pub(crate) fn handle_sob(&mut self, args: &Args) -> Result<(), MachineError> {
        let r = args.r.expect("BUG: sob requires a register");
        let nn = args.nn.expect("BUG: sob requires a displacement");

        self.reg[r] = self.reg[r].wrapping_sub(1);
        if self.reg[r] != 0 {
            self.reg[PC] = self.reg[PC].wrapping_sub(2 * nn);
        }
        Ok(())
    }
}
