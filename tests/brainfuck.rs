use bfjit::{Error, Program, TAPE_LEN};

fn run(source: &str) -> Vec<u8> {
    let program = Program::compile(source).expect("compile should succeed");
    let mut tape = vec![0u8; TAPE_LEN];
    unsafe { program.run(&mut tape) };
    tape
}

#[test]
fn increments_and_moves_the_pointer() {
    let tape = run("+++>++<");
    assert_eq!(tape[0], 3);
    assert_eq!(tape[1], 2);
}

#[test]
fn decrement_wraps_below_zero() {
    let tape = run("-");
    assert_eq!(tape[0], 255);
}

#[test]
fn fused_run_of_plus_wraps_modulo_256() {
    // 300 '+' in a row gets fused by the optimizer into a single delta; the
    // cell still has to land on 300 % 256 rather than saturate or panic.
    let source = "+".repeat(300);
    let tape = run(&source);
    assert_eq!(tape[0], 44);
}

#[test]
fn loop_multiplies_into_neighboring_cell() {
    // 3 * 3 using the classic move-and-decrement loop.
    let tape = run("+++[>+++<-]");
    assert_eq!(tape[0], 0);
    assert_eq!(tape[1], 9);
}

#[test]
fn skips_a_loop_body_when_the_cell_starts_at_zero() {
    let tape = run("[+++]+");
    assert_eq!(tape[0], 1);
}

#[test]
fn pointer_can_move_left_and_right_across_many_cells() {
    let source = format!("{}+{}", ">".repeat(100), "<".repeat(100));
    let tape = run(&source);
    assert_eq!(tape[100], 1);
    assert_eq!(tape[0], 0);
}

#[test]
fn rejects_unmatched_open_bracket() {
    match Program::compile("+[+") {
        Err(Error::Syntax { pos, .. }) => assert_eq!(pos, 1),
        Ok(_) => panic!("expected a syntax error"),
        Err(other) => panic!("expected a syntax error, got {other}"),
    }
}

#[test]
fn rejects_stray_close_bracket() {
    match Program::compile("+]") {
        Err(Error::Syntax { pos, .. }) => assert_eq!(pos, 1),
        Ok(_) => panic!("expected a syntax error"),
        Err(other) => panic!("expected a syntax error, got {other}"),
    }
}

#[test]
fn comments_outside_the_eight_operators_are_ignored() {
    let tape = run("this is a comment + and this is another +");
    assert_eq!(tape[0], 2);
}
