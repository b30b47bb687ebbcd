//! Test utilities: in-memory ZIP builders and a scriptable metadata engine.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Map;
use serde_json::Value;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::Result;
use crate::ScrubError;
use crate::engine::EngineSummary;
use crate::engine::FieldScope;
use crate::engine::MetadataEngine;
use crate::engine::TagMap;
use crate::types::TagAssignment;
use crate::types::TagName;

/// Line prefix [`FakeEngine`] treats as one embedded metadata field.
pub const META_PREFIX: &str = "META:";

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed
/// with mode 0o644.
///
/// # Examples
///
/// ```
/// use metascrub_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut builder = ZipTestBuilder::new();
    for (path, data) in entries {
        builder = builder.add_file(path, data);
    }
    builder.build()
}

/// Builder for ZIP test archives with various entry types.
///
/// # Examples
///
/// ```
/// use metascrub_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "file.txt")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_options(path, data, stored().unix_permissions(0o644))
    }

    /// Adds a stored file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.add_file_with_options(path, data, stored().unix_permissions(mode))
    }

    /// Adds a deflated file with mode 0o644.
    #[must_use]
    pub fn add_file_deflated(self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);
        self.add_file_with_options(path, data, options)
    }

    fn add_file_with_options(mut self, path: &str, data: &[u8], options: SimpleFileOptions) -> Self {
        self.writer.start_file(path, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.writer
            .add_directory(path, stored().unix_permissions(0o755))
            .unwrap();
        self
    }

    /// Adds a symbolic link entry.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.writer.add_symlink(path, target, stored()).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

/// Reads every entry of a ZIP file into `(name, content)` pairs, in order.
#[must_use]
pub fn read_zip_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            std::io::Read::read_to_end(&mut entry, &mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

/// Content with the given `META:` fields followed by a body line.
///
/// ```
/// use metascrub_core::test_utils::with_meta;
///
/// assert_eq!(with_meta(&["Artist=Jane"], "pixels"), b"META:Artist=Jane\npixels\n");
/// ```
#[must_use]
pub fn with_meta(fields: &[&str], body: &str) -> Vec<u8> {
    let mut out = String::new();
    for field in fields {
        out.push_str(META_PREFIX);
        out.push_str(field);
        out.push('\n');
    }
    out.push_str(body);
    out.push('\n');
    out.into_bytes()
}

/// In-process stand-in for the external engine.
///
/// Every line of a file starting with `META:` is one metadata field, written
/// as `META:Tag=Value`; tags starting with `GPS` belong to the GPS group.
/// Stripping removes the matching lines. Files whose name contains one of
/// the configured failure markers make the engine fail without touching
/// them.
#[derive(Debug, Default)]
pub struct FakeEngine {
    failing: HashSet<String>,
    unavailable: bool,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeEngine {
    /// Creates an engine that succeeds on every file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that behaves as if the executable were missing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Makes the engine fail on every file whose name contains `marker`.
    #[must_use]
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.failing.insert(marker.to_string());
        self
    }

    /// Paths the engine was invoked on, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, path: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        if self.unavailable {
            return Err(ScrubError::EngineNotFound("exiftool".to_string()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing.iter().any(|marker| name.contains(marker.as_str())) {
            return Err(ScrubError::EngineInvocation {
                path: path.to_path_buf(),
                detail: "Error: simulated engine failure".to_string(),
            });
        }
        Ok(())
    }

    fn rewrite(&self, path: &Path, edit: impl Fn(Vec<String>) -> Vec<String>) -> Result<EngineSummary> {
        self.enter(path)?;
        let original = fs::read_to_string(path)?;
        let lines: Vec<String> = original.lines().map(str::to_string).collect();
        let edited = edit(lines.clone());
        if edited == lines {
            return Ok(summary(0, 1));
        }
        let mut content = edited.join("\n");
        content.push('\n');
        fs::write(path, content)?;
        Ok(summary(1, 0))
    }

    fn walk(&self, dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                self.walk(&path, extensions, out);
            } else if extensions.is_empty()
                || path.extension().is_some_and(|ext| {
                    extensions
                        .iter()
                        .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(&ext.to_string_lossy()))
                })
            {
                out.push(path);
            }
        }
        out.sort();
    }

    fn over_tree(
        &self,
        dir: &Path,
        extensions: &[String],
        op: impl Fn(&Path) -> Result<EngineSummary>,
    ) -> Result<EngineSummary> {
        let mut files = Vec::new();
        self.walk(dir, extensions, &mut files);
        let mut total = EngineSummary::default();
        for file in files {
            match op(&file) {
                Ok(s) => {
                    total.updated += s.updated;
                    total.unchanged += s.unchanged;
                }
                Err(ScrubError::EngineNotFound(name)) => return Err(ScrubError::EngineNotFound(name)),
                Err(_) => total.errors += 1,
            }
        }
        total.raw = total.describe();
        Ok(total)
    }
}

fn summary(updated: usize, unchanged: usize) -> EngineSummary {
    let mut summary = EngineSummary {
        updated,
        unchanged,
        ..EngineSummary::default()
    };
    summary.raw = summary.describe();
    summary
}

fn parse_field(line: &str) -> Option<(&str, &str)> {
    let field = line.strip_prefix(META_PREFIX)?;
    Some(field.split_once('=').unwrap_or((field, "")))
}

fn matches_scope(line: &str, scope: &FieldScope) -> bool {
    let Some((tag, _)) = parse_field(line) else {
        return false;
    };
    match scope {
        FieldScope::All => true,
        FieldScope::Gps => tag.starts_with("GPS"),
        FieldScope::Tag(name) => {
            let wanted = name.as_str();
            let wanted = wanted.rsplit(':').next().unwrap_or(wanted);
            tag.eq_ignore_ascii_case(wanted)
        }
    }
}

fn apply_assignments(mut lines: Vec<String>, tags: &[TagAssignment]) -> Vec<String> {
    for assignment in tags {
        let tag = assignment.tag.as_str();
        lines.retain(|line| parse_field(line).is_none_or(|(t, _)| t != tag));
        if !assignment.value.is_empty() {
            lines.insert(0, format!("{META_PREFIX}{tag}={}", assignment.value));
        }
    }
    lines
}

impl MetadataEngine for FakeEngine {
    fn version(&self) -> Result<String> {
        if self.unavailable {
            return Err(ScrubError::EngineNotFound("exiftool".to_string()));
        }
        Ok("13.00-fake".to_string())
    }

    fn strip(&self, path: &Path, scope: &FieldScope, _backup: bool) -> Result<EngineSummary> {
        self.rewrite(path, |lines| {
            lines
                .into_iter()
                .filter(|line| !matches_scope(line, scope))
                .collect()
        })
    }

    fn read_grouped(&self, path: &Path) -> Result<TagMap> {
        self.enter(path)?;
        let content = fs::read_to_string(path)?;

        let mut exif = Map::new();
        let mut gps = Map::new();
        for (tag, value) in content.lines().filter_map(parse_field) {
            let group = if tag.starts_with("GPS") { &mut gps } else { &mut exif };
            group.insert(tag.to_string(), Value::String(value.to_string()));
        }

        let mut file = Map::new();
        file.insert(
            "FileName".to_string(),
            Value::String(path.file_name().unwrap_or_default().to_string_lossy().into_owned()),
        );

        let mut map = TagMap::new();
        map.insert("SourceFile".to_string(), Value::String(path.display().to_string()));
        map.insert("File".to_string(), Value::Object(file));
        if !exif.is_empty() {
            map.insert("EXIF".to_string(), Value::Object(exif));
        }
        if !gps.is_empty() {
            map.insert("GPS".to_string(), Value::Object(gps));
        }
        Ok(map)
    }

    fn read_tags(&self, path: &Path, tags: &[TagName]) -> Result<TagMap> {
        self.enter(path)?;
        let content = fs::read_to_string(path)?;
        let mut map = TagMap::new();
        map.insert("SourceFile".to_string(), Value::String(path.display().to_string()));
        for (tag, value) in content.lines().filter_map(parse_field) {
            if tags.iter().any(|t| t.as_str() == tag) {
                map.insert(tag.to_string(), Value::String(value.to_string()));
            }
        }
        Ok(map)
    }

    fn write_tags(
        &self,
        path: &Path,
        tags: &[TagAssignment],
        _backup: bool,
    ) -> Result<EngineSummary> {
        self.rewrite(path, |lines| apply_assignments(lines, tags))
    }

    fn copy_tags(&self, source: &Path, target: &Path, _backup: bool) -> Result<EngineSummary> {
        self.enter(source)?;
        let content = fs::read_to_string(source)?;
        let copied: Vec<TagAssignment> = content
            .lines()
            .filter_map(parse_field)
            .filter_map(|(tag, value)| Some(TagAssignment::new(TagName::new(tag).ok()?, value)))
            .collect();
        self.rewrite(target, |lines| apply_assignments(lines, &copied))
    }

    fn strip_tree(
        &self,
        dir: &Path,
        scope: &FieldScope,
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary> {
        self.over_tree(dir, extensions, |file| self.strip(file, scope, backup))
    }

    fn write_tree(
        &self,
        dir: &Path,
        tags: &[TagAssignment],
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary> {
        self.over_tree(dir, extensions, |file| self.write_tags(file, tags, backup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fake_engine_strip_and_count() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.jpg");
        fs::write(&file, with_meta(&["Artist=Jane", "GPSLatitude=1"], "body")).unwrap();

        let engine = FakeEngine::new();
        assert_eq!(engine.field_count(&file).unwrap(), 2);

        let summary = engine.strip(&file, &FieldScope::Gps, false).unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(engine.field_count(&file).unwrap(), 1);

        let summary = engine.strip(&file, &FieldScope::Gps, false).unwrap();
        assert_eq!(summary.unchanged, 1);
    }

    #[test]
    fn test_fake_engine_failure_leaves_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.jpg");
        let content = with_meta(&["Artist=Jane"], "body");
        fs::write(&file, &content).unwrap();

        let engine = FakeEngine::new().failing_on("broken");
        assert!(engine.strip(&file, &FieldScope::All, false).is_err());
        assert_eq!(fs::read(&file).unwrap(), content);
        assert_eq!(engine.calls(), vec![file]);
    }

    #[test]
    fn test_builder_entries_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.zip");
        let data = ZipTestBuilder::new()
            .add_directory("d/")
            .add_file("d/a.txt", b"a")
            .add_file_deflated("b.txt", b"b")
            .build();
        fs::write(&path, data).unwrap();

        let names: Vec<String> = read_zip_entries(&path).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["d/", "d/a.txt", "b.txt"]);
    }
}
