use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![instr_i64(Opcode::PUSH, 42), instr(Opcode::HALT)]);

    assert_eq!(1, vm.sp());
    assert_eq!(42, vm.stack()[0].as_i64());
}

#[test]
fn preserves_float_bits() {
    let vm = test_halts(vec![instr_f64(Opcode::PUSH, 2.25), instr(Opcode::HALT)]);

    assert_eq!(2.25, vm.stack()[0].as_f64());
}

#[test]
fn succeeds_at_the_last_free_slot() {
    let mut program = vec![instr_i64(Opcode::PUSH, 7); crate::constants::STACK_CAP];
    program.push(instr(Opcode::HALT));

    let vm = test_halts(program);

    assert_eq!(crate::constants::STACK_CAP, vm.sp());
}

#[test]
fn overflows_on_a_full_stack() {
    let program = vec![instr_i64(Opcode::PUSH, 7); crate::constants::STACK_CAP + 1];

    test_faults(program, Fault::StackOverflow);
}
