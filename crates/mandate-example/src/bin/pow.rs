//! `pow pow 2 10` prints `1024`.

use std::process::ExitCode;

use mandate::{command, Program};

/// Compute base ^ exp.
///
/// :param int base : The base.
/// :param int exp : The exponent.
#[command]
fn pow(base: i64, exp: u32) -> anyhow::Result<i64> {
    base.checked_pow(exp)
        .ok_or_else(|| anyhow::anyhow!("{} ^ {} does not fit in 64 bits", base, exp))
}

fn program() -> anyhow::Result<Program> {
    let mut program = Program::new("pow").version(env!("CARGO_PKG_VERSION"));
    program.command(pow__function())?;
    Ok(program)
}

fn main() -> ExitCode {
    mandate_example::run(program())
}
