//! Compile programs and execute them on the test machine.
mod common;

use common::Machine;
use jack::compile_instrs;

const MAIN: &str = include_str!("../programs/Main.jack");
const POINT: &str = include_str!("../programs/Point.jack");
const DRIVER: &str = include_str!("../programs/Driver.jack");

fn main_machine() -> Machine {
    Machine::new(compile_instrs(MAIN).unwrap())
}

#[test]
fn test_array_loops() {
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.squares", &[3]), 5);
    assert_eq!(machine.call("Main.squares", &[5]), 30);
}

#[test]
fn test_array_copy_between_elements() {
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.copy", &[]), 9);
}

#[test]
fn test_array_nested_index() {
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.nested", &[]), 7);
}

#[test]
fn test_do_keeps_stack_balanced() {
    // The machine asserts stack balance on every return.
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.balanced", &[]), 10);
}

#[test]
fn test_string_literal() {
    let mut machine = main_machine();
    let address = machine.call("Main.greeting", &[]);
    assert_eq!(machine.read_string(address), "Hi there");
}

#[test]
fn test_operators_left_to_right() {
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.leftToRight", &[]), 20);
    assert_eq!(machine.call("Main.grouped", &[]), 14);
    assert_eq!(machine.call("Main.divide", &[17, 5]), 3);
}

#[test]
fn test_conditionals() {
    let mut machine = main_machine();
    assert_eq!(machine.call("Main.greater", &[3, 2]), -1);
    assert_eq!(machine.call("Main.greater", &[2, 2]), 0);
    assert_eq!(machine.call("Main.greater", &[1, 2]), 0);

    assert_eq!(machine.call("Main.sign", &[-4]), -1);
    assert_eq!(machine.call("Main.sign", &[0]), 0);
    assert_eq!(machine.call("Main.sign", &[12]), 1);
}

#[test]
fn test_objects() {
    let mut machine = Machine::link([
        compile_instrs(POINT).unwrap(),
        compile_instrs(DRIVER).unwrap(),
    ]);

    // (2, 3) to (4, 6)
    assert_eq!(machine.call("Driver.run", &[]), 5);
    assert_eq!(machine.call("Driver.created", &[]), 2);
}

#[test]
fn test_constructor_stores_fields() {
    let mut machine = Machine::new(compile_instrs(POINT).unwrap());

    let p = machine.call("Point.new", &[7, 11]);
    assert_eq!(machine.read(p), 7);
    assert_eq!(machine.read(p + 1), 11);
    assert_eq!(machine.call("Point.getY", &[p]), 11);

    machine.call("Point.translate", &[p, -2, 1]);
    assert_eq!(machine.call("Point.getX", &[p]), 5);
    assert_eq!(machine.call("Point.getY", &[p]), 12);
}
