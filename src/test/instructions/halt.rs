use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![instr(Opcode::HALT)]);

    assert!(vm.halted());
    assert_eq!(0, vm.sp());
}

#[test]
fn does_not_advance_rip() {
    let vm = test_halts(vec![instr_i64(Opcode::PUSH, 1), instr(Opcode::HALT)]);

    assert_eq!(1, vm.rip());
}

#[test]
fn skips_the_rest_of_the_program() {
    let vm = test_halts(vec![
        instr(Opcode::HALT),
        instr_i64(Opcode::PUSH, 1),
    ]);

    assert_eq!(0, vm.sp());
}
