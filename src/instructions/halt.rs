use crate::error::MachineError;
use crate::machine::Machine;
use crate::operand::Args;

impl Machine {
    // HALT stops the run loop; the process exit itself belongs to main.
    // The final register state is printed here because on the real console
    // this is the moment the operator gets to look at the machine.
    pub(crate) fn handle_halt(&mut self, _args: &Args) -> Result<(), MachineError> {
        self.halted = true;
        println!("---------------- halted ----------------");
        println!("{}", self.register_dump());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::machine::{Machine, PC};

    #[test]
    fn test_halt_sets_the_flag() {
        let mut machine = Machine::new();
        let args = crate::operand::Args::resolve(&mut machine, &[], 0).unwrap();
        machine.handle_halt(&args).unwrap();
        assert!(machine.halted);
    }

    #[test]
    fn test_halt_leaves_registers_alone() {
        let mut machine = Machine::new();
        machine.reg[3] = 0o1234;
        machine.reg[PC] = 0o1002;
        let args = crate::operand::Args::resolve(&mut machine, &[], 0).unwrap();
        machine.handle_halt(&args).unwrap();
        assert_eq!(machine.reg[3], 0o1234);
        assert_eq!(machine.reg[PC], 0o1002);
    }
}
