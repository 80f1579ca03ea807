use colored::Colorize;
use schedrun::error::UsageError;
use schedrun::SchedError;
use std::process;

fn main() {
    if let Err(e) = schedrun::cli::run() {
        // clap formats its own errors, help and version output
        if let SchedError::Usage(UsageError::Clap(err)) = &e {
            err.exit();
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}
