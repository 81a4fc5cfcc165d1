use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 2),
        instr_i64(Opcode::PUSH, 3),
        instr(Opcode::IADD),
        instr(Opcode::HALT),
    ]);

    assert_eq!(1, vm.sp());
    assert_eq!(5, vm.stack()[0].as_i64());
}

#[test]
fn wraps_on_overflow() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, i64::max_value()),
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::IADD),
        instr(Opcode::HALT),
    ]);

    assert_eq!(i64::min_value(), vm.stack()[0].as_i64());
}

#[test]
fn underflows_with_one_operand() {
    test_faults(
        vec![instr_i64(Opcode::PUSH, 1), instr(Opcode::IADD)],
        Fault::StackUnderflow,
    );
}
