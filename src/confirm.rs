use std::io::{self, BufRead, Write};

/// Decision capability consulted before a destructive operation runs.
///
/// Injecting the decision keeps the engine free of any particular prompt
/// mechanism: the interactive shell plugs in [StdinConfirm], scripts and
/// tests plug in [AutoConfirm].
pub trait ConfirmAction {
    /// Returns true when the named action should proceed.
    fn confirm(&self, action: &str) -> bool;
}

/// Interactive y/n prompt on standard input.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl ConfirmAction for StdinConfirm {
    fn confirm(&self, action: &str) -> bool {
        print!("Are you sure you want to proceed with \"{action}\"? [y/n]: ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }
}

/// Pre-decided policy: always proceed or always decline.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl ConfirmAction for AutoConfirm {
    fn confirm(&self, _action: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_confirm_is_preset() {
        assert!(AutoConfirm(true).confirm("drop table users"));
        assert!(!AutoConfirm(false).confirm("drop table users"));
    }
}
