//! [`MetadataEngine`] backed by the `exiftool` binary.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;

use super::EngineSummary;
use super::FieldScope;
use super::MetadataEngine;
use super::TagMap;
use crate::Result;
use crate::ScrubError;
use crate::types::TagAssignment;
use crate::types::TagName;

/// Default executable name looked up on `PATH`.
pub const DEFAULT_BINARY: &str = "exiftool";

/// Drives the ExifTool command-line program.
///
/// Every call spawns one process with captured output. Paths are always
/// passed after `--` so a file named like an option is never parsed as one.
#[derive(Debug, Clone)]
pub struct ExifTool {
    bin: PathBuf,
}

impl ExifTool {
    /// Locates `exiftool` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::EngineNotFound` if no executable is found.
    pub fn locate() -> Result<Self> {
        Self::with_program(DEFAULT_BINARY)
    }

    /// Uses an explicit program: either a path to an executable or a name
    /// resolved through `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::EngineNotFound` if the program cannot be resolved.
    pub fn with_program(program: impl AsRef<Path>) -> Result<Self> {
        let program = program.as_ref();
        let bin = which::which(program).map_err(|e| {
            ScrubError::EngineNotFound(format!("{}: {e}", program.display()))
        })?;
        tracing::debug!(bin = %bin.display(), "resolved metadata engine");
        Ok(Self { bin })
    }

    /// Path of the resolved executable.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.bin
    }

    fn run(&self, target: &Path, args: Vec<OsString>) -> Result<Output> {
        tracing::trace!(bin = %self.bin.display(), ?args, "spawning engine");
        Command::new(&self.bin).args(&args).output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ScrubError::EngineNotFound(self.bin.display().to_string())
            } else {
                ScrubError::EngineInvocation {
                    path: target.to_path_buf(),
                    detail: e.to_string(),
                }
            }
        })
    }

    /// Runs a write command and parses its summary.
    fn run_write(&self, target: &Path, args: Vec<OsString>) -> Result<EngineSummary> {
        let output = self.run(target, args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let summary = EngineSummary::parse(&stdout);

        if !output.status.success() && summary.updated + summary.unchanged == 0 {
            return Err(invocation_error(target, &output));
        }
        if !summary.is_recognized() {
            return Err(ScrubError::EngineInvocation {
                path: target.to_path_buf(),
                detail: format!("unrecognized engine output: {}", summary.raw),
            });
        }

        Ok(summary)
    }

    /// Runs a JSON read command and returns the first object.
    fn run_read(&self, target: &Path, args: Vec<OsString>) -> Result<TagMap> {
        let output = self.run(target, args)?;

        // Exit status 1 with JSON on stdout means "read with minor errors".
        if !output.status.success() && (output.status.code() != Some(1) || output.stdout.is_empty())
        {
            return Err(invocation_error(target, &output));
        }

        parse_json_output(&output.stdout).map_err(|detail| ScrubError::EngineInvocation {
            path: target.to_path_buf(),
            detail,
        })
    }
}

impl MetadataEngine for ExifTool {
    fn version(&self) -> Result<String> {
        let output = self.run(&self.bin, vec!["-ver".into()])?;
        if !output.status.success() {
            return Err(invocation_error(&self.bin, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn strip(&self, path: &Path, scope: &FieldScope, backup: bool) -> Result<EngineSummary> {
        let mut args: Vec<OsString> = vec![scope.to_arg().into()];
        push_overwrite(&mut args, backup);
        push_target(&mut args, path);
        self.run_write(path, args)
    }

    fn read_grouped(&self, path: &Path) -> Result<TagMap> {
        let mut args: Vec<OsString> = ["-json", "-a", "-u", "-g"]
            .into_iter()
            .map(OsString::from)
            .collect();
        push_target(&mut args, path);
        self.run_read(path, args)
    }

    fn read_tags(&self, path: &Path, tags: &[TagName]) -> Result<TagMap> {
        let mut args: Vec<OsString> = vec!["-json".into()];
        args.extend(tags.iter().map(|tag| OsString::from(format!("-{tag}"))));
        push_target(&mut args, path);
        self.run_read(path, args)
    }

    fn write_tags(
        &self,
        path: &Path,
        tags: &[TagAssignment],
        backup: bool,
    ) -> Result<EngineSummary> {
        let mut args: Vec<OsString> = tags.iter().map(|t| t.to_arg().into()).collect();
        push_overwrite(&mut args, backup);
        push_target(&mut args, path);
        self.run_write(path, args)
    }

    fn copy_tags(&self, source: &Path, target: &Path, backup: bool) -> Result<EngineSummary> {
        // A relative source such as "-x.jpg" must not read as an option.
        let mut args: Vec<OsString> = vec!["-TagsFromFile".into(), anchored(source).into()];
        push_overwrite(&mut args, backup);
        push_target(&mut args, target);
        self.run_write(target, args)
    }

    fn strip_tree(
        &self,
        dir: &Path,
        scope: &FieldScope,
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary> {
        let mut args: Vec<OsString> = vec![scope.to_arg().into()];
        push_tree_options(&mut args, extensions);
        push_overwrite(&mut args, backup);
        push_target(&mut args, dir);
        self.run_write(dir, args)
    }

    fn write_tree(
        &self,
        dir: &Path,
        tags: &[TagAssignment],
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary> {
        let mut args: Vec<OsString> = tags.iter().map(|t| t.to_arg().into()).collect();
        push_tree_options(&mut args, extensions);
        push_overwrite(&mut args, backup);
        push_target(&mut args, dir);
        self.run_write(dir, args)
    }
}

fn push_overwrite(args: &mut Vec<OsString>, backup: bool) {
    if !backup {
        args.push("-overwrite_original".into());
    }
}

fn push_target(args: &mut Vec<OsString>, path: &Path) {
    args.push("--".into());
    args.push(path.as_os_str().to_os_string());
}

fn push_tree_options(args: &mut Vec<OsString>, extensions: &[String]) {
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.');
        if !ext.is_empty() {
            args.push("-ext".into());
            args.push(ext.into());
        }
    }
    args.push("-r".into());
}

fn anchored(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(".").join(path)
    }
}

fn invocation_error(target: &Path, output: &Output) -> ScrubError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = if stderr.trim().is_empty() {
        format!("engine exited with {}", output.status)
    } else {
        stderr.trim().to_string()
    };
    ScrubError::EngineInvocation {
        path: target.to_path_buf(),
        detail,
    }
}

/// Parses `-json` output: an array holding one object per file.
fn parse_json_output(stdout: &[u8]) -> std::result::Result<TagMap, String> {
    let value: Value =
        serde_json::from_slice(stdout).map_err(|e| format!("malformed engine JSON: {e}"))?;
    match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err("engine JSON entry is not an object".to_string()),
            None => Ok(TagMap::new()),
        },
        _ => Err("engine JSON is not an array".to_string()),
    }
}
