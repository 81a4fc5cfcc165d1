use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::POP),
        instr(Opcode::HALT),
    ]);

    assert_eq!(0, vm.sp());
}

#[test]
fn underflows_on_an_empty_stack() {
    test_faults(vec![instr(Opcode::POP)], Fault::StackUnderflow);
}
