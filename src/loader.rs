use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::machine::{MEMSIZE, Machine};

// The object-file format is plain ASCII text: a sequence of blocks, each
// introduced by an `ADDR COUNT` header line and followed by COUNT lines of
// one byte each. Every number is unprefixed hexadecimal. Blocks follow each
// other until end of file; an empty line ends the load early.
//
// 1000 3
// AA
// BB
// CC
//
// places AA/BB/CC at 0x1000..0x1002, so a word read at 0x1000 sees 0xBBAA.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub address: u16,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub blocks: Vec<Block>,
}

impl Program {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Program, LoadError> {
        let text = fs::read_to_string(path)?;
        Program::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Program, LoadError> {
        let mut blocks = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let line = line.trim();
            if line.is_empty() {
                // An empty line terminates the load
                break;
            }

            let mut parts = line.split_whitespace();
            let (addr_text, count_text) = match (parts.next(), parts.next(), parts.next()) {
                (Some(addr), Some(count), None) => (addr, count),
                _ => {
                    return Err(LoadError::BadHeader {
                        line: index + 1,
                        text: line.to_string(),
                    });
                }
            };
            let address = parse_hex_u16(addr_text, index)?;
            let count = parse_hex_u16(count_text, index)? as usize;

            if address as usize + count > MEMSIZE {
                return Err(LoadError::PastEndOfMemory { address, count });
            }

            let mut bytes = Vec::with_capacity(count);
            for _ in 0..count {
                let Some((index, line)) = lines.next() else {
                    return Err(LoadError::Truncated {
                        address,
                        expected: count,
                        found: bytes.len(),
                    });
                };
                let line = line.trim();
                let byte = u8::from_str_radix(line, 16).map_err(|_| LoadError::BadHex {
                    line: index + 1,
                    text: line.to_string(),
                })?;
                bytes.push(byte);
            }

            log::debug!("block at {:04x}: {} byte(s)", address, count);
            blocks.push(Block { address, bytes });
        }

        Ok(Program { blocks })
    }

    // Places every block into machine memory. Parsing already guaranteed
    // each block fits, so plain byte stores are enough.
    pub fn load(&self, machine: &mut Machine) {
        for block in &self.blocks {
            for (i, byte) in block.bytes.iter().enumerate() {
                machine.b_write(block.address + i as u16, *byte);
            }
        }
    }
}

fn parse_hex_u16(text: &str, index: usize) -> Result<u16, LoadError> {
    u16::from_str_radix(text, 16).map_err(|_| LoadError::BadHex {
        line: index + 1,
        text: text.to_string(),
    })
}
