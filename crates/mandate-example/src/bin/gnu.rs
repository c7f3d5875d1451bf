//! Mock of a few GNU `find` options.

use std::process::ExitCode;

use mandate::{command, Program};

/// Mock some features of the GNU find command.
///
/// This is not at all a complete program, but a simple representation to
/// showcase the most useful features.
///
/// :param path: The starting path.
/// :param pattern: The pattern to look for.
/// :param int maxdepth: Descend at most <levels>.
/// :param no_follow: Do not follow symlinks.
/// :param debug: Debug option, print diagnostic information.
#[command]
fn find(
    path: String,
    pattern: String,
    #[arg("-d", "--maxdepth", metavar = "levels")] maxdepth: Option<i64>,
    #[arg("-P")] no_follow: bool,
    #[arg("-D", metavar = "debug-opt")] debug: Option<String>,
) -> String {
    let mut lines = Vec::new();
    if maxdepth.is_some_and(|depth| depth < 2) {
        lines.push("If you choose maxdepth, at least set it > 1".to_string());
    }
    if no_follow {
        lines.push("Following symlinks...".to_string());
    }
    lines.push(format!(
        "Debug options: {}",
        debug.as_deref().unwrap_or("none")
    ));
    lines.push(format!("Starting search with pattern: {} in {}", pattern, path));
    lines.push("No file found!".to_string());
    lines.join("\n")
}

fn program() -> anyhow::Result<Program> {
    let mut program = Program::new("gnu").version(env!("CARGO_PKG_VERSION"));
    program.command(find__function())?;
    Ok(program)
}

fn main() -> ExitCode {
    mandate_example::run(program())
}
