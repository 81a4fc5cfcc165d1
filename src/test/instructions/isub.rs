use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 10),
        instr_i64(Opcode::PUSH, 4),
        instr(Opcode::ISUB),
        instr(Opcode::HALT),
    ]);

    assert_eq!(6, vm.stack()[0].as_i64());
}

#[test]
fn operand_order_is_left_minus_right() {
    let vm = test_halts(vec![
        instr_i64(Opcode::PUSH, 4),
        instr_i64(Opcode::PUSH, 10),
        instr(Opcode::ISUB),
        instr(Opcode::HALT),
    ]);

    assert_eq!(-6, vm.stack()[0].as_i64());
}
