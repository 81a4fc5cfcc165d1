use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_f64(Opcode::PUSH, 1.5),
        instr_f64(Opcode::PUSH, 2.25),
        instr(Opcode::FSUB),
        instr(Opcode::HALT),
    ]);

    assert_eq!(-0.75, vm.stack()[0].as_f64());
}
