//! A `git push` look-alike: overridden aliases next to documented ones.

use std::process::ExitCode;

use mandate::{command, Program};

/// Update remote refs along with associated objects.
///
/// :param repository: Repository to push to.
/// :param all: Push all refs.
/// :param dry_run: Dry run.
/// :param force: Force updates.
/// :param thin: Use thin pack.
#[command]
fn push(
    repository: String,
    all: bool,
    #[arg("--dry_run", "-n")] dry_run: bool,
    #[arg("--force", "-f")] force: bool,
    thin: bool,
) -> String {
    format!(
        "Pushing to {}. All: {}, dry run: {}, force: {}, thin: {}",
        repository, all, dry_run, force, thin
    )
}

fn program() -> anyhow::Result<Program> {
    let mut program = Program::new("git").version(env!("CARGO_PKG_VERSION"));
    program.command(push__function())?;
    Ok(program)
}

fn main() -> ExitCode {
    mandate_example::run(program())
}
