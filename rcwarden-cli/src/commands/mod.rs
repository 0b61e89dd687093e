pub mod lifecycle;
pub mod paths;
pub mod status;

use colored::Colorize;

/// One `OK: <name>: <message>` or `ERROR: <name>: <message>` line on stdout.
pub(crate) fn report(ok: bool, name: &str, message: &str) {
    let level = if ok {
        "OK:".green().bold()
    } else {
        "ERROR:".red().bold()
    };
    println!("{level} {name}: {message}");
}
