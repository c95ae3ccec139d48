use predefine::{
    log::StandardLogWriter, session::spawn_with_options, Error, Pattern,
};
use std::process::Command;

fn main() -> Result<(), Error> {
    let logger = StandardLogWriter::new(std::io::stdout());
    let mut p =
        spawn_with_options(Command::new("cat"), Some(logger), None)?;
    p.send_line("Hello World")?;
    p.expect(&Pattern::new("Hello World")?)?;
    Ok(())
}
