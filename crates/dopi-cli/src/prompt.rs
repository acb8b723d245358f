use std::io::{self, BufRead, Write};

use dopi::pipeline::{Confirm, Prompt};

/// Asks on stderr and reads the answer from stdin. `--yes` skips the question.
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: Prompt<'_>) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt.message());
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        for yes in ["y", "Y\n", " yes ", "YES\r\n"] {
            assert!(is_yes(yes), "{yes:?}");
        }
        for no in ["", "\n", "n", "no", "yep", "maybe"] {
            assert!(!is_yes(no), "{no:?}");
        }
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let confirm = StdinConfirm::new(true);
        assert!(confirm.confirm_overwrite("a.pdf"));
        assert!(confirm.confirm_delete("a.pdf"));
    }
}
