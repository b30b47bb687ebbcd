//! Integration tests for metascrub-cli.
//!
//! Commands that need ExifTool run against a small shell script standing in
//! for it (Unix only). In files given to the script, every line
//! `META:Tag=Value` is one metadata field.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn metascrub_cmd() -> Command {
    cargo_bin_cmd!("metascrub")
}

#[test]
fn test_version_flag() {
    metascrub_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("metascrub"));
}

#[test]
fn test_help_flag() {
    metascrub_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_clean_help() {
    metascrub_cmd()
        .args(["clean", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-compression-ratio"))
        .stdout(predicate::str::contains("--gps"));
}

#[test]
fn test_completion_bash() {
    metascrub_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("metascrub"));
}

#[test]
fn test_missing_engine_reports_hint() {
    let temp = tempfile::TempDir::new().unwrap();
    let file = temp.path().join("a.jpg");
    std::fs::write(&file, b"px").unwrap();

    metascrub_cmd()
        .arg("--exiftool")
        .arg(temp.path().join("no-such-exiftool"))
        .arg("view")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ExifTool not found"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_batch_requires_action() {
    metascrub_cmd()
        .args(["batch", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_sweep_removes_only_stale_workspaces() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("metascrub-old")).unwrap();
    std::fs::create_dir(temp.path().join("unrelated")).unwrap();

    metascrub_cmd()
        .args(["sweep", "--older-than", "0", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 stale workspace"));

    assert!(!temp.path().join("metascrub-old").exists());
    assert!(temp.path().join("unrelated").exists());
}

#[test]
fn test_sweep_keeps_recent_workspaces() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("metascrub-fresh")).unwrap();

    metascrub_cmd()
        .args(["--json", "sweep", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\": []"));

    assert!(temp.path().join("metascrub-fresh").exists());
}

#[cfg(unix)]
mod with_engine {
    use super::*;
    use metascrub_core::test_utils::ZipTestBuilder;
    use metascrub_core::test_utils::read_zip_entries;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use tempfile::TempDir;

    const FAKE_EXIFTOOL: &str = r#"#!/bin/sh
# Stand-in for exiftool. A line "META:Tag=Value" is one metadata field.

if [ "$1" = "-ver" ]; then
    echo "13.00"
    exit 0
fi

for target; do :; done

fields() {
    sed -n "s/^META:\($2[^=]*\)=\(.*\)\$/\"\1\": \"\2\"/p" "$1" | paste -sd, -
}

is_broken() {
    case "$(basename "$1")" in
    *broken*) return 0 ;;
    esac
    return 1
}

if [ "$1" = "-json" ]; then
    if is_broken "$target"; then
        echo "Error: unreadable file - $target" >&2
        exit 1
    fi
    if [ "$2" = "-a" ]; then
        list=$(fields "$target" "")
        printf '[{"SourceFile": "%s", "File": {"FileName": "%s"}' "$target" "$(basename "$target")"
        [ -n "$list" ] && printf ', "EXIF": {%s}' "$list"
    else
        list=$(fields "$target" "GPS")
        printf '[{"SourceFile": "%s"' "$target"
        [ -n "$list" ] && printf ', %s' "$list"
    fi
    printf '}]\n'
    exit 0
fi

copy_from=""
if [ "$1" = "-TagsFromFile" ]; then
    copy_from=$2
fi

apply() {
    f=$1
    shift
    if is_broken "$f"; then
        echo "Error: corrupt file - $f" >&2
        return 1
    fi
    tmp="$f.fake$$"
    cp "$f" "$tmp" || return 1
    if [ -n "$copy_from" ]; then
        { grep '^META:' "$copy_from"; grep -v '^META:' "$tmp"; } > "$tmp.n"
        mv "$tmp.n" "$tmp"
    fi
    for arg; do
        case "$arg" in
        -all=) grep -v '^META:' "$tmp" > "$tmp.n" ;;
        -gps:all=) grep -v '^META:GPS' "$tmp" > "$tmp.n" ;;
        -*=)
            tag=${arg#-}
            tag=${tag%=}
            grep -v "^META:$tag=" "$tmp" > "$tmp.n"
            ;;
        -*=*)
            kv=${arg#-}
            tag=${kv%%=*}
            { echo "META:$kv"; grep -v "^META:$tag=" "$tmp"; } > "$tmp.n"
            ;;
        *) continue ;;
        esac
        mv "$tmp.n" "$tmp"
    done
    if cmp -s "$f" "$tmp"; then
        rm -f "$tmp"
        return 2
    fi
    mv "$tmp" "$f"
}

updated=0
unchanged=0
failed=0

run_one() {
    apply "$@"
    case $? in
    0) updated=$((updated + 1)) ;;
    2) unchanged=$((unchanged + 1)) ;;
    *) failed=$((failed + 1)) ;;
    esac
}

if [ -d "$target" ]; then
    exts=""
    prev=""
    for arg; do
        [ "$prev" = "-ext" ] && exts="$exts $arg"
        prev=$arg
    done
    for f in $(find "$target" -type f | sort); do
        if [ -n "$exts" ]; then
            match=no
            for e in $exts; do
                [ "${f##*.}" = "$e" ] && match=yes
            done
            [ "$match" = yes ] || continue
        fi
        run_one "$f" "$@"
    done
    echo "    1 directories scanned"
else
    run_one "$target" "$@"
fi

[ "$updated" -gt 0 ] && echo "    $updated image files updated"
[ "$unchanged" -gt 0 ] && echo "    $unchanged image files unchanged"
if [ "$failed" -gt 0 ]; then
    echo "    $failed files weren't updated due to errors"
    exit 1
fi
exit 0
"#;

    /// Writes the stand-in once per test process.
    fn fake_exiftool() -> &'static Path {
        static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
        let (_dir, path) = SCRIPT.get_or_init(|| {
            let dir = TempDir::new().expect("failed to create script dir");
            let path = dir.path().join("exiftool");
            fs::write(&path, FAKE_EXIFTOOL).expect("failed to write script");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("failed to chmod script");
            (dir, path)
        });
        path
    }

    /// Scratch directory plus a private TMPDIR for workspaces.
    struct Env {
        temp: TempDir,
        tmpdir: PathBuf,
    }

    impl Env {
        fn new() -> Self {
            let temp = TempDir::new().expect("failed to create temp dir");
            let tmpdir = temp.path().join("tmp");
            fs::create_dir(&tmpdir).unwrap();
            Self { temp, tmpdir }
        }

        fn cmd(&self) -> Command {
            let mut cmd = metascrub_cmd();
            cmd.env("METASCRUB_EXIFTOOL", fake_exiftool())
                .env("TMPDIR", &self.tmpdir)
                .env_remove("METASCRUB_LOG");
            cmd
        }

        fn path(&self, name: &str) -> PathBuf {
            self.temp.path().join(name)
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        }

        fn write_zip(&self, name: &str, data: &[u8]) -> PathBuf {
            let path = self.path(name);
            fs::write(&path, data).unwrap();
            path
        }

        fn assert_no_workspace(&self) {
            let left: Vec<_> = fs::read_dir(&self.tmpdir).unwrap().collect();
            assert!(left.is_empty(), "workspace left behind: {left:?}");
        }
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    fn json_stdout(output: &std::process::Output) -> serde_json::Value {
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
    }

    fn sample_archive() -> Vec<u8> {
        ZipTestBuilder::new()
            .add_file("a.jpg", b"META:Artist=Jane\nMETA:GPSLatitude=40.7\npixels\n")
            .add_directory("docs/")
            .add_file("docs/readme.txt", b"plain text\n")
            .build()
    }

    #[test]
    fn test_view_lists_groups() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Artist=Jane\npx\n");

        env.cmd()
            .arg("view")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("[EXIF]"))
            .stdout(predicate::str::contains("Artist: Jane"));
    }

    #[test]
    fn test_view_json() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Make=Canon\npx\n");

        let output = env.cmd().arg("--json").arg("view").arg(&file).output().unwrap();
        assert!(output.status.success());
        let value = json_stdout(&output);
        assert_eq!(value["operation"], "view");
        assert_eq!(value["data"]["metadata"]["EXIF"]["Make"], "Canon");
    }

    #[test]
    fn test_view_missing_file() {
        let env = Env::new();
        env.cmd()
            .arg("view")
            .arg(env.path("missing.jpg"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("missing.jpg"));
    }

    #[test]
    fn test_strip_in_place() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Artist=Jane\nMETA:GPSLatitude=1\npx\n");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed all metadata"));
        assert_eq!(read(&file), "px\n");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing to remove"));
    }

    #[test]
    fn test_strip_gps_only() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Artist=Jane\nMETA:GPSLatitude=1\npx\n");

        env.cmd().arg("strip").arg(&file).arg("--gps").assert().success();
        assert_eq!(read(&file), "META:Artist=Jane\npx\n");
    }

    #[test]
    fn test_strip_single_tag() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Artist=Jane\nMETA:Make=Canon\npx\n");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .args(["--tag", "Artist"])
            .assert()
            .success();
        assert_eq!(read(&file), "META:Make=Canon\npx\n");
    }

    #[test]
    fn test_strip_to_copy_and_force() {
        let env = Env::new();
        let original = "META:Artist=Jane\npx\n";
        let file = env.write("a.jpg", original);
        let copy = env.path("a_clean.jpg");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .arg("--output")
            .arg(&copy)
            .assert()
            .success()
            .stdout(predicate::str::contains("Original kept"));
        assert_eq!(read(&file), original);
        assert_eq!(read(&copy), "px\n");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .arg("--output")
            .arg(&copy)
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"))
            .stderr(predicate::str::contains("--force"));

        env.cmd()
            .arg("strip")
            .arg(&file)
            .arg("--output")
            .arg(&copy)
            .arg("--force")
            .assert()
            .success();
    }

    #[test]
    fn test_strip_failure_removes_copy() {
        let env = Env::new();
        let file = env.write("a.jpg", "META:Artist=Jane\npx\n");
        let copy = env.path("broken_copy.jpg");

        env.cmd()
            .arg("strip")
            .arg(&file)
            .arg("-o")
            .arg(&copy)
            .assert()
            .failure()
            .stderr(predicate::str::contains("ExifTool failed"));
        assert!(!copy.exists());
    }

    #[test]
    fn test_gps_set_show_remove() {
        let env = Env::new();
        let file = env.write("a.jpg", "px\n");

        env.cmd()
            .args(["gps", "set"])
            .arg(&file)
            .args(["-33.5", "151.25", "--alt", "12"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 updated"));
        assert!(read(&file).contains("META:GPSLatitudeRef=S"));

        let output = env
            .cmd()
            .args(["--json", "gps", "show"])
            .arg(&file)
            .output()
            .unwrap();
        assert!(output.status.success());
        let value = json_stdout(&output);
        assert_eq!(value["data"]["latitude"], -33.5);
        assert_eq!(value["data"]["longitude"], 151.25);

        env.cmd()
            .args(["gps", "show"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("https://maps.google.com/?q=-33.5,151.25"));

        env.cmd().args(["gps", "remove"]).arg(&file).assert().success();
        assert_eq!(read(&file), "px\n");

        env.cmd()
            .args(["gps", "show"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("No GPS data"));
    }

    #[test]
    fn test_gps_set_out_of_range() {
        let env = Env::new();
        let file = env.write("a.jpg", "px\n");

        env.cmd()
            .args(["gps", "set"])
            .arg(&file)
            .args(["95", "10"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid coordinates"));
        assert_eq!(read(&file), "px\n");
    }

    #[test]
    fn test_edit_writes_tags() {
        let env = Env::new();
        let file = env.write("a.jpg", "px\n");

        env.cmd()
            .arg("edit")
            .arg(&file)
            .args(["Artist=Jane Doe", "Copyright=CC0"])
            .assert()
            .success();

        let content = read(&file);
        assert!(content.contains("META:Artist=Jane Doe"));
        assert!(content.contains("META:Copyright=CC0"));
    }

    #[test]
    fn test_edit_rejects_invalid_tag() {
        let env = Env::new();
        let file = env.write("a.jpg", "px\n");

        env.cmd()
            .arg("edit")
            .arg(&file)
            .arg("Bad Tag=x")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid tag"));
        assert_eq!(read(&file), "px\n");
    }

    #[test]
    fn test_batch_strip_with_extensions() {
        let env = Env::new();
        let jpg = env.write("photos/a.jpg", "META:Artist=Jane\npx\n");
        let nested = env.write("photos/sub/b.jpg", "META:Make=Canon\npx\n");
        let txt = env.write("photos/notes.txt", "META:Artist=Jane\ntext\n");

        env.cmd()
            .arg("batch")
            .arg(env.path("photos"))
            .args(["--strip-all", "--ext", "jpg"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 updated"));

        assert_eq!(read(&jpg), "px\n");
        assert_eq!(read(&nested), "px\n");
        assert_eq!(read(&txt), "META:Artist=Jane\ntext\n");
    }

    #[test]
    fn test_batch_set_tag() {
        let env = Env::new();
        let a = env.write("photos/a.jpg", "px\n");

        env.cmd()
            .arg("batch")
            .arg(env.path("photos"))
            .args(["--set", "Copyright=CC0"])
            .assert()
            .success();
        assert_eq!(read(&a), "META:Copyright=CC0\npx\n");
    }

    #[test]
    fn test_copy_tags() {
        let env = Env::new();
        let source = env.write("src.jpg", "META:Artist=Jane\npx\n");
        let target = env.write("dst.jpg", "other\n");

        env.cmd()
            .arg("copy-tags")
            .arg(&source)
            .arg(&target)
            .assert()
            .success();
        assert_eq!(read(&target), "META:Artist=Jane\nother\n");

        env.cmd()
            .arg("copy-tags")
            .arg(&source)
            .arg(&source)
            .assert()
            .failure()
            .stderr(predicate::str::contains("is the input file"));
    }

    #[test]
    fn test_clean_archive() {
        let env = Env::new();
        let data = sample_archive();
        let source = env.write_zip("photos.zip", &data);

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("Archive cleaned"))
            .stdout(predicate::str::contains("photos_clean.zip"));

        let entries = read_zip_entries(&env.path("photos_clean.zip"));
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "docs/", "docs/readme.txt"]);
        assert_eq!(entries[0].1, b"pixels\n");
        assert_eq!(entries[2].1, b"plain text\n");
        assert_eq!(fs::read(&source).unwrap(), data);
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_gps_only_json() {
        let env = Env::new();
        let source = env.write_zip("photos.zip", &sample_archive());
        let dest = env.path("out.zip");

        let output = env
            .cmd()
            .args(["--json", "clean"])
            .arg(&source)
            .arg("-o")
            .arg(&dest)
            .arg("--gps")
            .output()
            .unwrap();
        assert!(output.status.success());

        let value = json_stdout(&output);
        assert_eq!(value["operation"], "clean");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["cleaned"], 1);
        assert_eq!(value["data"]["unchanged"], 1);
        assert_eq!(value["data"]["scope"], "GPS data");

        let entries = read_zip_entries(&dest);
        assert_eq!(entries[0].1, b"META:Artist=Jane\npixels\n");
    }

    #[test]
    fn test_clean_partial_failure_exits_zero() {
        let env = Env::new();
        let data = ZipTestBuilder::new()
            .add_file("good.jpg", b"META:Artist=Jane\npx\n")
            .add_file("broken.jpg", b"META:Artist=Jane\npx\n")
            .build();
        let source = env.write_zip("mixed.zip", &data);

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("Archive cleaned with failures"))
            .stdout(predicate::str::contains("broken.jpg"));

        let entries = read_zip_entries(&env.path("mixed_clean.zip"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, b"px\n");
        assert_eq!(entries[1].1, b"META:Artist=Jane\npx\n");
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_total_failure_exits_nonzero() {
        let env = Env::new();
        let data = ZipTestBuilder::new()
            .add_file("broken_1.jpg", b"px\n")
            .add_file("broken_2.jpg", b"px\n")
            .build();
        let source = env.write_zip("bad.zip", &data);

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Archive not cleaned"))
            .stderr(predicate::str::contains("No file in"));

        assert!(!env.path("bad_clean.zip").exists());
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_refuses_existing_destination() {
        let env = Env::new();
        let source = env.write_zip("photos.zip", &sample_archive());
        let dest = env.write("photos_clean.zip", "keep me");

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));
        assert_eq!(read(&dest), "keep me");
        env.assert_no_workspace();

        env.cmd()
            .arg("clean")
            .arg(&source)
            .arg("--force")
            .assert()
            .success();
        assert_eq!(read_zip_entries(&dest).len(), 3);
    }

    #[test]
    fn test_clean_destination_is_source() {
        let env = Env::new();
        let source = env.write_zip("photos.zip", &sample_archive());

        env.cmd()
            .arg("clean")
            .arg(&source)
            .arg("-o")
            .arg(&source)
            .assert()
            .failure()
            .stderr(predicate::str::contains("is the input file"));
    }

    #[test]
    fn test_clean_invalid_archive() {
        let env = Env::new();
        let source = env.write("notes.zip", "this is not a zip archive");

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid archive"));
        assert!(!env.path("notes_clean.zip").exists());
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_accepts_any_extension() {
        let env = Env::new();
        let source = env.write_zip("comic.cbz", &sample_archive());

        env.cmd().arg("clean").arg(&source).assert().success();
        assert!(env.path("comic_clean.zip").exists());
    }

    #[test]
    fn test_clean_skips_unsafe_entries() {
        let env = Env::new();
        let data = ZipTestBuilder::new()
            .add_file("../evil.jpg", b"META:Artist=x\n")
            .add_file("ok.jpg", b"META:Artist=Jane\npx\n")
            .build();
        let source = env.write_zip("unsafe.zip", &data);

        env.cmd()
            .arg("clean")
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("Skipped entries"))
            .stdout(predicate::str::contains("../evil.jpg"));

        let names: Vec<String> = read_zip_entries(&env.path("unsafe_clean.zip"))
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["ok.jpg"]);
        assert!(!env.temp.path().join("evil.jpg").exists());
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_file_limit() {
        let env = Env::new();
        let source = env.write_zip("photos.zip", &sample_archive());

        env.cmd()
            .arg("clean")
            .arg(&source)
            .args(["--max-files", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--max-files"));
        env.assert_no_workspace();
    }

    #[test]
    fn test_clean_parallel_jobs() {
        let env = Env::new();
        let mut builder = ZipTestBuilder::new();
        for i in 0..8 {
            builder = builder.add_file(&format!("img{i}.jpg"), b"META:Artist=Jane\npx\n");
        }
        let source = env.write_zip("many.zip", &builder.build());

        let output = env
            .cmd()
            .args(["--json", "clean"])
            .arg(&source)
            .args(["--jobs", "4"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value = json_stdout(&output);
        assert_eq!(value["data"]["cleaned"], 8);
        let paths: Vec<&str> = value["data"]["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["path"].as_str().unwrap())
            .collect();
        let expected: Vec<String> = (0..8).map(|i| format!("img{i}.jpg")).collect();
        assert_eq!(paths, expected);
        env.assert_no_workspace();
    }

    #[test]
    fn test_inspect_archive() {
        let env = Env::new();
        let data = sample_archive();
        let source = env.write_zip("photos.zip", &data);

        env.cmd()
            .arg("inspect")
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("2 fields"))
            .stdout(predicate::str::contains("no metadata"))
            .stdout(predicate::str::contains("Files with metadata: 1 of 2"));

        assert_eq!(fs::read(&source).unwrap(), data);
        env.assert_no_workspace();
    }

    #[test]
    fn test_inspect_json_is_repeatable() {
        let env = Env::new();
        let source = env.write_zip("photos.zip", &sample_archive());

        let run = || {
            let output = env
                .cmd()
                .args(["--json", "inspect"])
                .arg(&source)
                .output()
                .unwrap();
            assert!(output.status.success());
            json_stdout(&output)["data"]["findings"].clone()
        };

        let first = run();
        assert_eq!(first[0]["field_count"], 2);
        assert_eq!(first[1]["has_metadata"], false);
        assert_eq!(first, run());
    }
}
