use super::*;

fn branch_program(a: i64, b: i64) -> Vec<Instruction> {
    vec![
        instr_i64(Opcode::PUSH, a),
        instr_i64(Opcode::PUSH, b),
        instr_u64(Opcode::IJGT, 5),
        instr_i64(Opcode::PUSH, -1),
        instr(Opcode::HALT),
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::HALT),
    ]
}

#[test]
fn taken_when_first_operand_is_greater() {
    let vm = test_halts(branch_program(5, 3));

    assert_eq!(1, vm.stack()[0].as_i64());
}

#[test]
fn not_taken_when_equal() {
    let vm = test_halts(branch_program(3, 3));

    assert_eq!(-1, vm.stack()[0].as_i64());
}

#[test]
fn compares_signed() {
    let vm = test_halts(branch_program(-1, 1));

    assert_eq!(-1, vm.stack()[0].as_i64());
}
