use super::*;

fn branch_program(a: i64, b: i64) -> Vec<Instruction> {
    vec![
        instr_i64(Opcode::PUSH, a),
        instr_i64(Opcode::PUSH, b),
        instr_u64(Opcode::IJEQ, 5),
        instr_i64(Opcode::PUSH, -1),
        instr(Opcode::HALT),
        instr_i64(Opcode::PUSH, 1),
        instr(Opcode::HALT),
    ]
}

#[test]
fn taken() {
    let vm = test_halts(branch_program(3, 3));

    assert_eq!(1, vm.stack()[0].as_i64());
}

#[test]
fn not_taken() {
    let vm = test_halts(branch_program(3, 4));

    assert_eq!(-1, vm.stack()[0].as_i64());
}

#[test]
fn pops_both_operands() {
    let vm = test_halts(branch_program(3, 3));

    assert_eq!(1, vm.sp());
}

#[test]
fn underflows_with_one_operand() {
    test_faults(
        vec![instr_i64(Opcode::PUSH, 1), instr_u64(Opcode::IJEQ, 0)],
        Fault::StackUnderflow,
    );
}
