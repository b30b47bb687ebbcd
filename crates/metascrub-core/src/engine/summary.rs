//! Parsing of the engine's write summary.

/// Counters from the summary ExifTool prints after a write, e.g.
///
/// ```text
///     1 image files updated
///     2 image files unchanged
///     1 files weren't updated due to errors
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSummary {
    /// Files the engine modified.
    pub updated: usize,
    /// Files the engine left as they were (nothing to remove).
    pub unchanged: usize,
    /// Files the engine reported errors for.
    pub errors: usize,
    /// Directories scanned in recursive mode.
    pub directories: usize,
    /// The raw stdout, trimmed.
    pub raw: String,
}

impl EngineSummary {
    /// Parses engine stdout. Lines that are not summary lines are ignored.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        let mut summary = Self {
            raw: stdout.trim().to_string(),
            ..Self::default()
        };

        for line in stdout.lines() {
            let line = line.trim();
            let Some((count, text)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let Ok(count) = count.parse::<usize>() else {
                continue;
            };

            if text.contains("due to errors") {
                summary.errors += count;
            } else if text.ends_with("unchanged") {
                summary.unchanged += count;
            } else if text.ends_with("updated") || text.ends_with("created") {
                summary.updated += count;
            } else if text.contains("directories scanned") {
                summary.directories += count;
            }
        }

        summary
    }

    /// Returns `true` if the output carried at least one file counter.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.updated + self.unchanged + self.errors > 0
    }

    /// One-line description for result panels.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = vec![
            format!("{} updated", self.updated),
            format!("{} unchanged", self.unchanged),
        ];
        if self.errors > 0 {
            parts.push(format!("{} failed", self.errors));
        }
        parts.join(", ")
    }
}
