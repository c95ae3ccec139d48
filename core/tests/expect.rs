use predefine::{spawn, Error, Pattern};
use std::process::Command;
use std::time::Duration;

#[test]
fn expect_str() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("Hello World").unwrap();
    session.expect(&Pattern::new("Hello World").unwrap()).unwrap();
}

#[test]
fn expect_before() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("Hello World").unwrap();
    let m = session.expect(&Pattern::new("lo.*").unwrap()).unwrap();
    assert_eq!(m.before(), "Hel");
    assert_eq!(m.group(0), Some("lo World\r"));
}

#[test]
fn expect_captures() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("#ATOMS=17 SYMMETRY=c2v )").unwrap();
    let headline =
        Pattern::new(r"#ATOMS=(\d+)\s+SYMMETRY=([a-zA-Z_0-9]+)\s+\)").unwrap();
    let m = session.expect(&headline).unwrap();
    assert_eq!(m.group(1), Some("17"));
    assert_eq!(m.group(2), Some("c2v"));
    assert_eq!(m.index(), 0);
}

#[test]
fn expect_any_prefers_first_candidate() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("abc def").unwrap();

    // wait for the whole line so both candidates are in the buffer
    std::thread::sleep(Duration::from_millis(300));

    let first = Pattern::new("def").unwrap();
    let second = Pattern::new("abc").unwrap();
    let m = session.expect_any(&[&first, &second]).unwrap();
    assert_eq!(m.index(), 0);
    assert_eq!(m.group(0), Some("def"));
}

#[test]
fn expect_any_reports_fallback_candidate() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("only the second one").unwrap();
    let missing = Pattern::new("NOT THERE").unwrap();
    let present = Pattern::new("second (one)").unwrap();
    let m = session.expect_any(&[&missing, &present]).unwrap();
    assert_eq!(m.index(), 1);
    assert_eq!(m.group(1), Some("one"));
}

#[test]
fn expect_consumes_through_match() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("one two").unwrap();
    session.expect(&Pattern::new("one").unwrap()).unwrap();
    let m = session.expect(&Pattern::new("two").unwrap()).unwrap();
    assert_eq!(m.before(), " ");
}

#[test]
fn expect_timeout() {
    let mut command = Command::new("sleep");
    command.arg("3");
    let mut p = spawn(command).unwrap();
    p.set_expect_timeout(Duration::from_millis(100));
    match p.expect(&Pattern::new("never").unwrap()) {
        Err(Error::ExpectTimeout { patterns, .. }) => {
            assert_eq!(patterns, vec!["never".to_string()]);
        }
        r => panic!("should raise a timeout {r:?}"),
    }
}

#[test]
fn expect_timeout_carries_tail() {
    let mut session = spawn(Command::new("cat")).unwrap();
    session.send_line("some pending output").unwrap();
    session.set_expect_timeout(Duration::from_millis(200));
    match session.expect(&Pattern::new("never").unwrap()) {
        Err(Error::ExpectTimeout { tail, .. }) => {
            assert!(tail.contains("some pending output"), "tail: {tail:?}");
        }
        r => panic!("should raise a timeout {r:?}"),
    }
}

#[test]
fn expect_eof() {
    let mut command = Command::new("echo");
    command.arg("over");
    let mut session = spawn(command).unwrap();
    session.expect(&Pattern::new("over").unwrap()).unwrap();
    match session.expect(&Pattern::new("more").unwrap()) {
        Err(Error::Eof { patterns, .. }) => {
            assert_eq!(patterns, vec!["more".to_string()]);
        }
        r => panic!("should raise EOF {r:?}"),
    }
}

#[test]
fn pattern_rejects_bad_regex() {
    match Pattern::new("(unclosed") {
        Err(Error::RegexParsing(source)) => {
            assert_eq!(source, "(unclosed");
        }
        r => panic!("should fail parsing {r:?}"),
    }
}
