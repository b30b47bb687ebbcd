//! Overwrite confirmation.

use console::Term;
use std::path::Path;

/// Decides whether an existing output may be replaced.
///
/// `--force` always allows it. Otherwise the user is asked on an interactive
/// terminal; without one the answer is no, so scripts never block and never
/// overwrite silently.
pub fn confirm_overwrite(path: &Path, force: bool, quiet: bool) -> bool {
    if force {
        return true;
    }
    if !path.exists() || quiet {
        return false;
    }

    let term = Term::stderr();
    if !term.is_term() || !Term::stdout().is_term() {
        return false;
    }
    if term
        .write_str(&format!("{} already exists. Overwrite? [y/N] ", path.display()))
        .is_err()
    {
        return false;
    }
    term.read_line().is_ok_and(|answer| is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
