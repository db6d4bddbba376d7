use std::collections::HashMap;

use phf::phf_map;

use crate::error::AsmError;

// Assembler for a tiny PDP-11 dialect:
//
//     . = 1000          ; origin directive, octal
//     start:  mov #5, r1
//             add r1, r2
//             clr r3
//             halt      ; trailing comments are stripped
//
// The output is object-file text in the loader's `ADDR COUNT` format, one
// block from the origin, with every instruction word emitted low byte
// first. Immediate operands become extension words right after their
// instruction word.

pub const DEFAULT_ORIGIN: u16 = 0o1000;

#[derive(Debug, Clone, Copy)]
struct Encoding {
    opcode: u16,
    operands: usize,
}

// Instruction words are opcode | ss << 6 | dd, matching the emulator's
// decode table.
static MNEMONIC_MAP: phf::Map<&'static str, Encoding> = phf_map! {
    "halt" => Encoding { opcode: 0o000000, operands: 0 },
    "mov" => Encoding { opcode: 0o010000, operands: 2 },
    "add" => Encoding { opcode: 0o060000, operands: 2 },
    "clr" => Encoding { opcode: 0o005000, operands: 1 },
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Register(u16),
    Immediate(u16),
    Label(String),
}

pub fn assemble(source: &str) -> Result<String, AsmError> {
    let mut origin: Option<u16> = None;
    let mut bytes: Vec<u8> = Vec::new();
    // Labels are collected with their addresses as they appear.
    // TODO: resolve label operands against this table once the encoder
    // grows a second pass.
    let mut labels: HashMap<String, u16> = HashMap::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line = index + 1;

        // Strip the `; comment` tail, fold case, trim
        let text = raw_line.split(';').next().unwrap_or("").trim().to_lowercase();
        if text.is_empty() {
            continue;
        }

        if text.starts_with('.') {
            let address = parse_origin(&text, line)?;
            if !bytes.is_empty() {
                return Err(AsmError::LateOrigin { line });
            }
            origin = Some(address);
            continue;
        }

        let mut rest = text.as_str();
        if let Some((label, tail)) = rest.split_once(':') {
            let label = label.trim();
            if !is_identifier(label) {
                return Err(AsmError::BadOperand {
                    line,
                    text: label.to_string(),
                });
            }
            let address = origin.unwrap_or(DEFAULT_ORIGIN) + bytes.len() as u16;
            labels.insert(label.to_string(), address);
            rest = tail.trim();
        }
        if rest.is_empty() {
            continue; // label-only line
        }

        let (name, tail) = match rest.split_once(char::is_whitespace) {
            Some((name, tail)) => (name, tail.trim()),
            None => (rest, ""),
        };
        let encoding = MNEMONIC_MAP.get(name).ok_or_else(|| AsmError::UnknownMnemonic {
            line,
            text: name.to_string(),
        })?;

        let operands: Vec<&str> = if tail.is_empty() {
            Vec::new()
        } else {
            tail.split(',').map(str::trim).collect()
        };
        if operands.len() != encoding.operands {
            return Err(AsmError::WrongOperandCount {
                line,
                name: name.to_string(),
                expected: encoding.operands,
                found: operands.len(),
            });
        }

        let words = encode(encoding, &operands, line)?;
        log::debug!("{}: {} -> {} word(s)", line, name, words.len());
        for word in words {
            let [low, high] = word.to_le_bytes();
            bytes.push(low);
            bytes.push(high);
        }
    }

    if bytes.is_empty() {
        return Ok(String::new());
    }

    let origin = origin.unwrap_or(DEFAULT_ORIGIN);
    let mut object = format!("{:x} {:x}\n", origin, bytes.len());
    for byte in bytes {
        object.push_str(&format!("{:02x}\n", byte));
    }
    Ok(object)
}

// `. = <octal>` is the only directive
fn parse_origin(text: &str, line: usize) -> Result<u16, AsmError> {
    let bad = || AsmError::BadDirective {
        line,
        text: text.to_string(),
    };
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let address = compact.strip_prefix(".=").ok_or_else(bad)?;
    u16::from_str_radix(address, 8).map_err(|_| bad())
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn parse_operand(text: &str, line: usize) -> Result<Token, AsmError> {
    let bad = || AsmError::BadOperand {
        line,
        text: text.to_string(),
    };

    if let Some(number) = text.strip_prefix('r') {
        if let Ok(n) = number.parse::<u16>() {
            if n > 7 {
                return Err(bad());
            }
            return Ok(Token::Register(n));
        }
    }
    if let Some(number) = text.strip_prefix('#') {
        let value = number.parse::<u16>().map_err(|_| bad())?;
        return Ok(Token::Immediate(value));
    }
    if is_identifier(text) {
        return Ok(Token::Label(text.to_string()));
    }
    Err(bad())
}

fn encode(encoding: &Encoding, operands: &[&str], line: usize) -> Result<Vec<u16>, AsmError> {
    let mut words = vec![encoding.opcode];

    match operands {
        [] => {}

        // Single-operand instructions take a plain register destination
        [destination] => {
            let dd = destination_field(destination, line)?;
            words[0] |= dd;
        }

        // Two-operand instructions: the source may be a register or an
        // immediate, the destination a register. An immediate is mode 2 on
        // r7 and its value follows as an extension word.
        [source, destination] => {
            let ss = match parse_operand(source, line)? {
                Token::Register(n) => n,
                Token::Immediate(value) => {
                    words.push(value);
                    0o27
                }
                Token::Label(text) => return Err(AsmError::UnresolvedLabel { line, text }),
            };
            let dd = destination_field(destination, line)?;
            words[0] |= (ss << 6) | dd;
        }

        _ => unreachable!("operand count checked against the mnemonic table"),
    }

    Ok(words)
}

fn destination_field(text: &str, line: usize) -> Result<u16, AsmError> {
    match parse_operand(text, line)? {
        Token::Register(n) => Ok(n),
        Token::Immediate(_) => Err(AsmError::BadOperand {
            line,
            text: text.to_string(),
        }),
        Token::Label(text) => Err(AsmError::UnresolvedLabel { line, text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halt_alone() {
        assert_eq!(assemble("halt\n").unwrap(), "200 2\n00\n00\n");
    }

    #[test]
    fn test_immediate_mov() {
        // mov #5, r1 is 0o012701 (0x15c1) followed by the literal
        assert_eq!(
            assemble("mov #5, r1\nhalt\n").unwrap(),
            "200 6\nc1\n15\n05\n00\n00\n00\n"
        );
    }

    #[test]
    fn test_register_to_register_add() {
        // add r2, r1 is 0o060201 = 0x6081
        assert_eq!(assemble("add r2, r1\n").unwrap(), "200 2\n81\n60\n");
    }

    #[test]
    fn test_clr_register() {
        // clr r3 is 0o005003 = 0x0a03
        assert_eq!(assemble("clr r3\n").unwrap(), "200 2\n03\n0a\n");
    }

    #[test]
    fn test_origin_directive() {
        // Octal 2000 is hex 400
        assert_eq!(assemble(". = 2000\nhalt\n").unwrap(), "400 2\n00\n00\n");
    }

    #[test]
    fn test_origin_after_code_is_rejected() {
        assert!(matches!(
            assemble("halt\n. = 2000\n"),
            Err(AsmError::LateOrigin { line: 2 })
        ));
    }

    #[test]
    fn test_bad_directive_is_rejected() {
        assert!(matches!(
            assemble(". fill 2000\n"),
            Err(AsmError::BadDirective { line: 1, .. })
        ));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let source = "; a whole-line comment\n\nmov r1, r2 ; trailing\n";
        assert_eq!(assemble(source).unwrap(), "200 2\n42\n10\n");
    }

    #[test]
    fn test_labels_and_case_are_accepted() {
        let source = "Loop: MOV R1, R2\nhalt\n";
        assert_eq!(assemble(source).unwrap(), "200 4\n42\n10\n00\n00\n");
    }

    #[test]
    fn test_label_only_line() {
        assert_eq!(assemble("done:\nhalt\n").unwrap(), "200 2\n00\n00\n");
    }

    #[test]
    fn test_empty_source_produces_empty_object() {
        assert_eq!(assemble("; nothing here\n").unwrap(), "");
    }

    #[test]
    fn test_unknown_mnemonic_is_rejected() {
        assert!(matches!(
            assemble("jmp r1\n"),
            Err(AsmError::UnknownMnemonic { line: 1, .. })
        ));
    }

    #[test]
    fn test_wrong_operand_count_is_rejected() {
        assert!(matches!(
            assemble("mov r1\n"),
            Err(AsmError::WrongOperandCount {
                line: 1,
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_register_out_of_range_is_rejected() {
        assert!(matches!(
            assemble("mov r9, r1\n"),
            Err(AsmError::BadOperand { line: 1, .. })
        ));
    }

    #[test]
    fn test_immediate_destination_is_rejected() {
        assert!(matches!(
            assemble("mov r1, #5\n"),
            Err(AsmError::BadOperand { line: 1, .. })
        ));
    }

    #[test]
    fn test_label_operand_is_rejected() {
        assert!(matches!(
            assemble("loop: mov loop, r1\n"),
            Err(AsmError::UnresolvedLabel { line: 1, .. })
        ));
    }
}
