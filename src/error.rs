use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("unaligned word address {0:06o}")]
    UnalignedAddress(u16),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read object file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 'ADDR COUNT' block header, got '{text}'")]
    BadHeader { line: usize, text: String },
    #[error("line {line}: invalid hex value '{text}'")]
    BadHex { line: usize, text: String },
    #[error("block at {address:04x} is truncated: expected {expected} bytes, found {found}")]
    Truncated {
        address: u16,
        expected: usize,
        found: usize,
    },
    #[error("block at {address:04x} with {count} bytes runs past the end of memory")]
    PastEndOfMemory { address: u16, count: usize },
}

#[derive(Debug, Error)]
pub enum AsmError {
    #[error("cannot read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unknown mnemonic '{text}'")]
    UnknownMnemonic { line: usize, text: String },
    #[error("line {line}: bad operand '{text}'")]
    BadOperand { line: usize, text: String },
    #[error("line {line}: '{name}' takes {expected} operand(s), found {found}")]
    WrongOperandCount {
        line: usize,
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: label '{text}' cannot be used as an operand yet")]
    UnresolvedLabel { line: usize, text: String },
    #[error("line {line}: bad directive '{text}'")]
    BadDirective { line: usize, text: String },
    #[error("line {line}: the origin directive must precede all code")]
    LateOrigin { line: usize },
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error(transparent)]
    Machine(#[from] MachineError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Asm(#[from] AsmError),
}
