#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use serde_json::Value;
use tempfile::TempDir;

/// Shell stand-in for `python -m pip`, driven by files in `REPIPE_FAKE_PIP_STATE`.
///
/// - `available.txt`: what bare package names resolve to.
/// - `deps.txt`: pins a with-deps resolution of a requirements file pulls in.
/// - `installed.txt`: the environment, as `pip freeze` prints it.
/// - `fail-install`: makes non-dry-run installs fail.
/// - `calls.log`: one line of argv per invocation.
const FAKE_PIP: &str = r#"#!/bin/sh
state="${REPIPE_FAKE_PIP_STATE:?}"
echo "$*" >> "$state/calls.log"
if [ "$1" != "-m" ] || [ "$2" != "pip" ]; then
  echo "unexpected invocation: $*" >&2
  exit 9
fi
shift 2
cmd="$1"
shift

pins_of() {
  grep -E '^[A-Za-z0-9._-]+==[^=]+$' "$1" 2>/dev/null || true
}

if [ "$cmd" = "freeze" ]; then
  cat "$state/installed.txt" 2>/dev/null
  exit 0
fi

dry=0
nodeps=0
report=""
reqs=""
specs=""
while [ $# -gt 0 ]; do
  case "$1" in
    --dry-run) dry=1 ;;
    --no-deps) nodeps=1 ;;
    --quiet|--ignore-installed) ;;
    --report) shift; report="$1" ;;
    -r) shift; reqs="$1" ;;
    *) specs="$specs $1" ;;
  esac
  shift
done

pins="$state/pins.$$"
: > "$pins"
if [ -n "$reqs" ]; then
  pins_of "$reqs" >> "$pins"
  if [ "$nodeps" = 0 ] && [ "${reqs%.lock}" = "$reqs" ]; then
    pins_of "$state/deps.txt" >> "$pins"
  fi
else
  for spec in $specs; do
    case "$spec" in
      *==*) echo "$spec" >> "$pins" ;;
      *)
        line=$(grep -i "^$spec==" "$state/available.txt" 2>/dev/null | head -n 1)
        if [ -z "$line" ]; then
          echo "ERROR: No matching distribution found for $spec" >&2
          rm -f "$pins"
          exit 1
        fi
        echo "$line" >> "$pins"
        ;;
    esac
  done
fi

if [ "$dry" = 1 ]; then
  {
    printf '{"version": "1", "install": ['
    sep=""
    while IFS= read -r pin; do
      printf '%s{"metadata": {"name": "%s", "version": "%s"}}' "$sep" "${pin%%==*}" "${pin#*==}"
      sep=", "
    done < "$pins"
    printf ']}\n'
  } > "$report"
  rm -f "$pins"
  exit 0
fi

if [ -f "$state/fail-install" ]; then
  echo "ERROR: Could not install packages due to an OSError" >&2
  rm -f "$pins"
  exit 1
fi
touch "$state/installed.txt"
while IFS= read -r pin; do
  grep -v -i "^${pin%%==*}==" "$state/installed.txt" > "$state/installed.tmp" || true
  echo "$pin" >> "$state/installed.tmp"
  mv "$state/installed.tmp" "$state/installed.txt"
done < "$pins"
rm -f "$pins"
echo "Successfully installed"
"#;

pub struct FakePip {
    _temp: TempDir,
    pub project: PathBuf,
    pub state: PathBuf,
    pub python: PathBuf,
}

impl FakePip {
    pub fn new() -> Self {
        let temp = tempfile::Builder::new()
            .prefix("repipe-cli-")
            .tempdir()
            .expect("tempdir");
        let project = temp.path().join("project");
        let state = temp.path().join("pip-state");
        fs::create_dir_all(&project).expect("project dir");
        fs::create_dir_all(&state).expect("state dir");
        let python = temp.path().join("python");
        write_executable(&python, FAKE_PIP);
        Self {
            _temp: temp,
            project,
            state,
            python,
        }
    }

    pub fn requirements(&self, contents: &str) -> PathBuf {
        let path = self.project.join("requirements.txt");
        fs::write(&path, contents).expect("write requirements");
        path
    }

    pub fn available(&self, pins: &[&str]) {
        write_lines(&self.state.join("available.txt"), pins);
    }

    pub fn dependencies(&self, pins: &[&str]) {
        write_lines(&self.state.join("deps.txt"), pins);
    }

    pub fn installed(&self, lines: &[&str]) {
        write_lines(&self.state.join("installed.txt"), lines);
    }

    pub fn fail_installs(&self) {
        fs::write(self.state.join("fail-install"), "").expect("fail flag");
    }

    pub fn installed_listing(&self) -> String {
        fs::read_to_string(self.state.join("installed.txt")).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repipe");
        cmd.current_dir(&self.project)
            .env("REPIPE_FAKE_PIP_STATE", &self.state)
            .env("REPIPE_PYTHON", &self.python)
            .env_remove("REPIPE_PIP_QUIET")
            .env("NO_COLOR", "1");
        cmd
    }
}

pub fn lock_path(requirements: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", requirements.display()))
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

fn write_lines(path: &Path, lines: &[&str]) {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(path, contents).expect("write state file");
}

#[cfg(unix)]
fn write_executable(path: &Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, contents).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

#[cfg(not(unix))]
fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write script");
}
