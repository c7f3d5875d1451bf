use std::process::ExitCode;

use mandate::{command, Program};

/// Echo the given text.
#[command]
fn echo(text: String, capitalize: bool) -> String {
    if capitalize {
        text.to_uppercase()
    } else {
        text
    }
}

fn program() -> anyhow::Result<Program> {
    let mut program = Program::new("echo");
    program.command(echo__function())?;
    Ok(program)
}

fn main() -> ExitCode {
    mandate_example::run(program())
}
