use predefine::{spawn, Error, Pattern};
use std::process::Command;
use std::time::Duration;

#[test]
fn send_line_roundtrip() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("Hello World").unwrap();

    let m = session.expect(&Pattern::new("\n").unwrap()).unwrap();
    assert_eq!(m.before(), "Hello World\r");
}

#[test]
fn send_empty_line() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("").unwrap();
    session.expect(&Pattern::new("\n").unwrap()).unwrap();
}

#[test]
fn send_without_line_ending() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send("Hello").unwrap();
    session.send(" World\n").unwrap();
    let m = session.expect(&Pattern::new("\n").unwrap()).unwrap();
    assert_eq!(m.before(), "Hello World\r");
}

#[test]
fn is_alive_reports_running_child() {
    let mut session = spawn(Command::new("cat")).unwrap();
    assert!(session.is_alive().unwrap());
}

#[test]
fn send_to_exited_child_is_broken_session() {
    let mut session = spawn(Command::new("true")).unwrap();

    // give the child time to exit
    std::thread::sleep(Duration::from_millis(300));

    match session.send_line("hello") {
        Err(Error::BrokenSession) => {}
        r => panic!("should raise a broken session {r:?}"),
    }
    assert!(!session.is_alive().unwrap());
}

#[test]
fn close_reaps_exited_child() {
    let mut command = Command::new("echo");
    command.arg("bye");
    let mut session = spawn(command).unwrap();
    session.expect(&Pattern::new("bye").unwrap()).unwrap();
    session.close().unwrap();
}

#[test]
fn close_times_out_on_stubborn_child() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.set_expect_timeout(Duration::from_millis(200));
    match session.close() {
        Err(Error::ExpectTimeout { .. }) => {}
        r => panic!("should raise a timeout {r:?}"),
    }
}

#[test]
fn spawn_no_command() {
    assert!(spawn(Command::new("")).is_err());
}
