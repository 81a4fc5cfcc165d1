use super::*;

#[test]
fn works() {
    let vm = test_halts(vec![
        instr_f64(Opcode::PUSH, 2.5),
        instr_f64(Opcode::PUSH, -2.0),
        instr(Opcode::FMUL),
        instr(Opcode::HALT),
    ]);

    assert_eq!(-5.0, vm.stack()[0].as_f64());
}
