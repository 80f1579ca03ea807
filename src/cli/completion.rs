//! Shell completion scripts

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use std::str::FromStr;

/// Write the completion script for `shell` to `out`
pub fn write_completion(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Print the completion script for `shell` to stdout
pub fn print_completion(shell: Shell, cmd: &mut Command) {
    write_completion(shell, cmd, &mut io::stdout());
}

/// Parse a shell name as accepted by `--completions`
pub fn parse_shell(name: &str) -> Option<Shell> {
    Shell::from_str(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("schedrun")
            .arg(Arg::new("scheduler").long("scheduler"))
            .arg(Arg::new("n_cores").long("n-cores"))
    }

    #[test]
    fn test_bash_completion_lists_flags() {
        let mut output = Vec::new();
        write_completion(Shell::Bash, &mut command(), &mut output);
        let script = String::from_utf8(output).unwrap();
        assert!(script.contains("--scheduler"));
        assert!(script.contains("--n-cores"));
    }

    #[test]
    fn test_completion_for_all_shells() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut output = Vec::new();
            write_completion(shell, &mut command(), &mut output);
            assert!(!output.is_empty(), "Shell {:?} generated empty completion", shell);
        }
    }

    #[test]
    fn test_parse_shell() {
        assert_eq!(parse_shell("bash"), Some(Shell::Bash));
        assert_eq!(parse_shell("zsh"), Some(Shell::Zsh));
        assert_eq!(parse_shell("cmd"), None);
    }
}
