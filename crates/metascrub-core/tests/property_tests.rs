//! Property-based tests for entry validation, engine arguments and jobs.
//!
//! These tests use proptest to generate arbitrary inputs and verify
//! that the safety properties hold across a wide range of cases.

#![allow(clippy::expect_used)]

use metascrub_core::ArchiveJob;
use metascrub_core::CancelToken;
use metascrub_core::JobConfig;
use metascrub_core::NoopProgress;
use metascrub_core::engine::EngineSummary;
use metascrub_core::test_utils::FakeEngine;
use metascrub_core::test_utils::ZipTestBuilder;
use metascrub_core::test_utils::with_meta;
use metascrub_core::types::GpsCoordinates;
use metascrub_core::types::SafePath;
use metascrub_core::types::TagName;
use metascrub_core::types::gps::parse_coordinate;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn canonical_root() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = temp.path().canonicalize().expect("failed to canonicalize");
    (temp, root)
}

fn value_of(coords: &GpsCoordinates, tag: &str) -> String {
    coords
        .to_assignments()
        .into_iter()
        .find(|a| a.tag.as_str() == tag)
        .map(|a| a.value)
        .expect("tag missing")
}

proptest! {
    /// Any entry with a `..` component is rejected.
    #[test]
    fn prop_parent_traversal_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}",
        backslash in any::<bool>(),
    ) {
        let (_temp, root) = canonical_root();
        let name = format!("{prefix}../{suffix}");
        let name = if backslash { name.replace('/', "\\") } else { name };
        prop_assert!(SafePath::validate(&name, &root).is_err());
    }

    /// Plain relative names are accepted and keep their ZIP form.
    #[test]
    fn prop_valid_relative_paths_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..5)
    ) {
        let (_temp, root) = canonical_root();
        let name = components.join("/");
        let safe = SafePath::validate(&name, &root);
        prop_assert!(safe.is_ok());
        prop_assert_eq!(safe.expect("validated").to_zip_name(), name);
    }

    /// Backslash and slash separators name the same entry.
    #[test]
    fn prop_backslash_is_separator(
        components in prop::collection::vec("[a-z0-9]{1,10}", 1..5)
    ) {
        let (_temp, root) = canonical_root();
        let forward = SafePath::validate(&components.join("/"), &root).expect("forward");
        let back = SafePath::validate(&components.join("\\"), &root).expect("backslash");
        prop_assert_eq!(forward, back);
    }

    /// A leading slash is always rejected.
    #[test]
    fn prop_absolute_rejected(rest in "[a-z]{1,10}(/[a-z]{1,10}){0,3}") {
        let (_temp, root) = canonical_root();
        let abs = format!("/{rest}");
        prop_assert!(SafePath::validate(&abs, &root).is_err());
    }

    /// An accepted tag name can never become an extra engine option.
    #[test]
    fn prop_tag_name_never_an_option(name in "\\PC{0,24}") {
        if let Ok(tag) = TagName::new(name) {
            let text = tag.as_str();
            prop_assert!(!text.starts_with('-'));
            prop_assert!(!text.chars().any(|c| c.is_whitespace() || c == '='));
        }
    }

    /// Coordinates written as tags read back to the same signed value.
    #[test]
    fn prop_gps_assignments_read_back(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0,
    ) {
        let coords = GpsCoordinates::new(lat, lon, None).expect("in range");
        let lat_back = parse_coordinate(
            &value_of(&coords, "GPSLatitude"),
            Some(&value_of(&coords, "GPSLatitudeRef")),
        ).expect("latitude parses");
        let lon_back = parse_coordinate(
            &value_of(&coords, "GPSLongitude"),
            Some(&value_of(&coords, "GPSLongitudeRef")),
        ).expect("longitude parses");
        prop_assert!((lat_back - lat).abs() < 1e-9);
        prop_assert!((lon_back - lon).abs() < 1e-9);
    }

    /// Summary parsing never panics and never counts unrelated lines.
    #[test]
    fn prop_summary_parse_total(lines in prop::collection::vec("[a-z ]{0,30}", 0..8)) {
        let summary = EngineSummary::parse(&lines.join("\n"));
        prop_assert_eq!(summary.updated + summary.unchanged + summary.errors, 0);
        prop_assert!(!summary.is_recognized());
    }

    /// Counts in summary lines are parsed exactly.
    #[test]
    fn prop_summary_counts(updated in 0usize..10_000, unchanged in 0usize..10_000) {
        let stdout = format!(
            "    {updated} image files updated\n    {unchanged} image files unchanged\n"
        );
        let summary = EngineSummary::parse(&stdout);
        prop_assert_eq!(summary.updated, updated);
        prop_assert_eq!(summary.unchanged, unchanged);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Inspecting never modifies the archive and always gives the same counts.
    #[test]
    fn prop_inspect_is_repeatable(
        files in prop::collection::vec(
            ("[a-z]{1,8}", prop::collection::vec("[A-Z][a-z]{1,8}=[a-z]{0,6}", 0..4)),
            1..6,
        )
    ) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let mut builder = ZipTestBuilder::new();
        let mut expected = Vec::new();
        for (i, (stem, fields)) in files.iter().enumerate() {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            builder = builder.add_file(&format!("{i}_{stem}.jpg"), &with_meta(&fields, "pixels"));
            expected.push(distinct_tags(&fields));
        }
        let source = temp.path().join("in.zip");
        let bytes = builder.build();
        fs::write(&source, &bytes).expect("write archive");

        let engine = FakeEngine::new();
        let config = JobConfig::default().with_workspace_root(temp.path());
        let job = ArchiveJob::inspect(&source).expect("job");

        let counts = |report: metascrub_core::JobReport| -> Vec<usize> {
            report.findings.iter().map(|f| f.field_count).collect()
        };
        let first = job.run(&engine, &config, &CancelToken::new(), &mut NoopProgress).expect("first");
        let second = job.run(&engine, &config, &CancelToken::new(), &mut NoopProgress).expect("second");

        prop_assert_eq!(counts(first), expected.clone());
        prop_assert_eq!(counts(second), expected);
        prop_assert_eq!(fs::read(&source).expect("read archive"), bytes);
        prop_assert!(only_archive_left(temp.path()));
    }
}

/// Repeated tags collapse into one field when grouped.
fn distinct_tags(fields: &[&str]) -> usize {
    let mut tags: Vec<&str> = fields
        .iter()
        .map(|f| f.split_once('=').map_or(*f, |(tag, _)| tag))
        .collect();
    tags.sort_unstable();
    tags.dedup();
    tags.len()
}

fn only_archive_left(dir: &Path) -> bool {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .all(|entry| entry.file_name() == "in.zip")
}
