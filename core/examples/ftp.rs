use predefine::{spawn, Error, Pattern};
use std::process::Command;

fn main() -> Result<(), Error> {
    let mut command = Command::new("ftp");
    command.arg("bks4-speedtest-1.tele2.net");
    let mut p = spawn(command)?;
    p.expect(&Pattern::new(r"Name \(.*\):")?)?;
    p.send_line("anonymous")?;
    p.expect(&Pattern::new("Password")?)?;
    p.send_line("test")?;
    p.expect(&Pattern::new("ftp>")?)?;
    p.send_line("cd upload")?;
    p.expect(&Pattern::new("successfully changed.")?)?;
    p.send_line("pwd")?;
    let m = p.expect(&Pattern::new(r#"[0-9]+ "(/upload)""#)?)?;
    println!("server reported {:?}", m.group(1));
    p.send_line("exit")?;
    p.expect(&Pattern::new("Goodbye.")?)?;
    p.close()?;
    Ok(())
}
