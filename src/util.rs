//! Small pipeline utilities: per-unit timing and baseline diffing.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Measures a scope and appends a one-line timing entry to a unit log
/// buffer. Logs are buffered per work unit so parallel workers' output is
/// never interleaved.
pub struct TimedScope {
    label: String,
    start: Instant,
}

impl TimedScope {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    /// Appends `"{label} done in {ms} ms"` to the buffer.
    pub fn finish(self, log: &mut String) {
        let elapsed = self.start.elapsed().as_secs_f64() * 1e3;
        let _ = writeln!(log, "{} done in {elapsed:.1} ms", self.label);
    }
}

/// Advisory regression hook: diffs newly generated source files against a
/// stored baseline directory. Differences are reported in the unit log but
/// never affect compile success.
#[derive(Debug, Clone)]
pub struct RefDiffer {
    ref_dir: PathBuf,
}

impl RefDiffer {
    #[must_use]
    pub fn new(ref_dir: impl Into<PathBuf>) -> Self {
        Self {
            ref_dir: ref_dir.into(),
        }
    }

    /// Compares `src_path` against the same-named file in the reference
    /// directory, appending findings to the unit log.
    pub fn check(&self, src_path: &Path, log: &mut String) {
        let Some(file_name) = src_path.file_name() else {
            return;
        };
        let ref_path = self.ref_dir.join(file_name);

        let Ok(reference) = std::fs::read_to_string(&ref_path) else {
            let _ = writeln!(log, "No reference for {}", ref_path.display());
            return;
        };
        match std::fs::read_to_string(src_path) {
            Ok(generated) if generated == reference => {
                let _ = writeln!(log, "Matches reference: {}", ref_path.display());
            }
            Ok(_) => {
                let _ = writeln!(log, "DIFFERS from reference: {}", ref_path.display());
            }
            Err(err) => {
                let _ = writeln!(log, "Cannot read {}: {err}", src_path.display());
            }
        }
    }
}
