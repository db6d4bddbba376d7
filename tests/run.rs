use pdp11::asm;
use pdp11::error::MachineError;
use pdp11::loader::Program;
use pdp11::machine::{Machine, PC, START_ADDRESS};

// Renders words as object-file text at the default start address, the way
// the assembler would emit them: low byte first.
fn object_text(words: &[u16]) -> String {
    let mut text = format!("{:x} {:x}\n", START_ADDRESS, words.len() * 2);
    for word in words {
        let [low, high] = word.to_le_bytes();
        text.push_str(&format!("{:02x}\n{:02x}\n", low, high));
    }
    text
}

fn boot(object: &str) -> Machine {
    let program = Program::parse(object).expect("object text should parse");
    let mut machine = Machine::new();
    program.load(&mut machine);
    machine.reg[PC] = START_ADDRESS;
    machine
}

#[test]
fn immediate_mov_into_register() {
    let mut machine = boot(&object_text(&[
        0o012701, // mov #5, r1
        0o000005,
        0o000000, // halt
    ]));
    machine.run().unwrap();

    assert!(machine.halted);
    assert_eq!(machine.reg[1], 5);
    assert_eq!(machine.reg[PC], 0o1006);
}

#[test]
fn mov_then_add_between_registers() {
    let mut machine = boot(&object_text(&[
        0o012702, // mov #3, r2
        0o000003,
        0o012701, // mov #4, r1
        0o000004,
        0o060201, // add r2, r1
        0o000000, // halt
    ]));
    machine.run().unwrap();

    assert_eq!(machine.reg[1], 7);
    assert_eq!(machine.reg[2], 3);
}

#[test]
fn clr_wipes_a_preloaded_register() {
    let mut machine = boot(&object_text(&[
        0o005003, // clr r3
        0o000000, // halt
    ]));
    machine.reg[3] = 0o177777;
    machine.run().unwrap();

    assert_eq!(machine.reg[3], 0);
}

#[test]
fn sob_loop_runs_the_body_three_times() {
    // The body bumps a memory cell through absolute addressing, so the cell
    // counts exactly how many times the loop ran.
    let counter = 0o2000;
    let mut machine = boot(&object_text(&[
        0o012700, // mov #3, r0
        0o000003,
        0o062737, // add #1, @#counter
        0o000001,
        counter,
        0o077004, // sob r0, 4  (back to the add)
        0o000000, // halt
    ]));
    machine.run().unwrap();

    assert_eq!(machine.reg[0], 0);
    assert_eq!(machine.w_read(counter).unwrap(), 3);
}

#[test]
fn loader_endianness_round_trip() {
    let program = Program::parse("1000 2\nCD\nAB\n").unwrap();
    let mut machine = Machine::new();
    program.load(&mut machine);

    assert_eq!(machine.w_read(0x1000).unwrap(), 0xABCD);
}

#[test]
fn unaligned_word_access_is_fatal_and_leaves_memory_alone() {
    let mut machine = Machine::new();
    assert!(matches!(
        machine.w_read(0o1001),
        Err(MachineError::UnalignedAddress(0o1001))
    ));
    assert!(matches!(
        machine.w_write(0o1001, 0o177777),
        Err(MachineError::UnalignedAddress(0o1001))
    ));
    assert_eq!(machine.b_read(0o1000), 0);
    assert_eq!(machine.b_read(0o1001), 0);
    assert_eq!(machine.b_read(0o1002), 0);
}

#[test]
fn assembled_source_runs_on_the_emulator() {
    let object = asm::assemble("mov #5, r1\nadd r1, r2\nhalt\n").unwrap();
    let mut machine = boot(&object);
    machine.run().unwrap();

    assert!(machine.halted);
    assert_eq!(machine.reg[1], 5);
    assert_eq!(machine.reg[2], 5);
}

#[test]
fn assembled_origin_matches_the_default_start() {
    let explicit = asm::assemble(". = 1000\nmov #7, r3\nhalt\n").unwrap();
    let implicit = asm::assemble("mov #7, r3\nhalt\n").unwrap();
    assert_eq!(explicit, implicit);

    let mut machine = boot(&explicit);
    machine.run().unwrap();
    assert_eq!(machine.reg[3], 7);
}
