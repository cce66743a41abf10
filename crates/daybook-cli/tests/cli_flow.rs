use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use daybook_core::keys::ENTRIES_INDEX_KEY;
use daybook_core::{AgeSqliteStore, KeyValueStore};

const PASSPHRASE: &str = "test-passphrase-secure-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_daybook"))
}

struct Env {
    dir: tempfile::TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("c")).expect("config dir");
        std::fs::create_dir_all(dir.path().join("d")).expect("data dir");
        Self { dir }
    }

    fn journal_path(&self) -> PathBuf {
        self.dir.path().join("d").join("daybook").join("journal.daybook")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("XDG_CONFIG_HOME", self.dir.path().join("c"))
            .env("XDG_DATA_HOME", self.dir.path().join("d"))
            .env("DAYBOOK_PASSPHRASE", PASSPHRASE)
            .env_remove("DAYBOOK_CONFIG")
            .env_remove("DAYBOOK_PATH")
            .env_remove("DAYBOOK_LOG")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run daybook")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn init(&self) {
        self.run_ok(&["init"]);
    }
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("valid JSON output")
}

#[test]
fn test_cli_init_write_list_show() {
    let env = Env::new();
    env.init();
    assert!(env.journal_path().exists());
    assert!(env.dir.path().join("c").join("daybook").join("config.toml").exists());

    env.run_ok(&["write", "--date", "2023-03-12", "--rating", "4", "--text", "good day"]);
    env.run_ok(&["write", "--date", "2023-03-15", "--rating", "2", "--text", "bad day"]);

    let list = json(&env.run_ok(&["list", "--min-rating", "3", "--json"]));
    assert_eq!(
        list,
        serde_json::json!([{"date": "2023-03-12", "rating": 4, "text": "good day"}])
    );

    let list = json(&env.run_ok(&["list", "--word", "bad", "--json"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["date"], "2023-03-15");

    let shown = env.run_ok(&["show", "2023-03-12", "--quiet"]);
    assert_eq!(shown.trim(), "good day");
}

#[test]
fn test_cli_write_reads_stdin() {
    let env = Env::new();
    env.init();

    let mut child = env
        .command(&["write", "--date", "2023-03-12", "--rating", "3"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn write");
    {
        use std::io::Write;
        let mut stdin = child.stdin.take().expect("stdin");
        stdin.write_all(b"from a pipe\n").expect("write stdin");
    }
    let output = child.wait_with_output().expect("wait write");
    assert!(output.status.success());

    let shown = json(&env.run_ok(&["show", "2023-03-12", "--json"]));
    assert_eq!(shown["text"], "from a pipe");
}

#[test]
fn test_cli_wrong_passphrase_exit_code() {
    let env = Env::new();
    env.init();

    let output = env
        .command(&["list"])
        .env("DAYBOOK_PASSPHRASE", "wrong-passphrase-456")
        .output()
        .expect("run list");
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_cli_missing_journal_exit_code() {
    let env = Env::new();
    let output = env.run(&["list"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("daybook init"));
}

#[test]
fn test_cli_rejects_out_of_range_rating() {
    let env = Env::new();
    env.init();

    let output = env.run(&["write", "--date", "2023-03-12", "--rating", "9", "--text", "x"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_show_missing_day_is_not_found() {
    let env = Env::new();
    env.init();

    let output = env.run(&["show", "2023-01-01"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_cli_export_dumps_store() {
    let env = Env::new();
    env.init();
    env.run_ok(&["write", "--date", "2023-03-12", "--rating", "4", "--text", "good day"]);

    let dump = json(&env.run_ok(&["export"]));
    assert_eq!(dump["entry.2023-3-12"]["text"], "good day");
    assert_eq!(dump["entriesIndex"], serde_json::json!(["entry.2023-3-12"]));
    assert_eq!(dump["monthIndex"], serde_json::json!(["month.2023-3"]));
    assert_eq!(dump["schema"], 1);
}

#[test]
fn test_cli_check_and_repair_orphan() {
    let env = Env::new();
    env.init();
    env.run_ok(&["write", "--date", "2023-03-12", "--rating", "4", "--text", "good day"]);
    env.run_ok(&["check"]);

    drop_entries_index(&env.journal_path());

    let output = env.run(&["check"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("entry.2023-3-12"));

    env.run_ok(&["repair"]);
    env.run_ok(&["check"]);

    let list = json(&env.run_ok(&["list", "--json"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
}

fn drop_entries_index(path: &Path) {
    let store = AgeSqliteStore::open(path, PASSPHRASE).expect("open journal");
    store
        .set_array(ENTRIES_INDEX_KEY, Vec::new())
        .expect("clear entries index");
    store.close().expect("close journal");
}

#[test]
fn test_cli_migrate_reports_current_version() {
    let env = Env::new();
    env.init();

    let out = env.run_ok(&["migrate"]);
    assert!(out.contains("Schema version 1 is current."), "{}", out);
}

#[test]
fn test_cli_reset_requires_confirmation() {
    let env = Env::new();
    env.init();
    env.run_ok(&["write", "--date", "2023-03-12", "--rating", "4", "--text", "good day"]);

    let output = env.run(&["reset"]);
    assert_eq!(output.status.code(), Some(4));

    env.run_ok(&["reset", "--yes"]);
    let list = json(&env.run_ok(&["list", "--json"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn test_cli_draft_flow() {
    let env = Env::new();
    env.init();

    env.run_ok(&["draft", "save", "--date", "2023-03-12", "--rating", "3", "--text", "half done"]);
    let draft = json(&env.run_ok(&["draft", "show", "--json"]));
    assert_eq!(draft["text"], "half done");
    assert_eq!(draft["editing_started"], "2023-03-12");

    env.run_ok(&["draft", "commit"]);
    let shown = json(&env.run_ok(&["show", "2023-03-12", "--json"]));
    assert_eq!(shown["rating"], 3);

    let output = env.run(&["draft", "show"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_cli_pin_flow() {
    let env = Env::new();
    env.init();

    env.run_ok(&["pin", "set", "4829"]);
    env.run_ok(&["pin", "verify", "4829"]);

    let output = env.run(&["pin", "verify", "1111"]);
    assert_eq!(output.status.code(), Some(5));

    let output = env.run(&["pin", "set", "12"]);
    assert_eq!(output.status.code(), Some(4));

    env.run_ok(&["pin", "clear"]);
    let output = env.run(&["pin", "verify", "4829"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_cli_completions() {
    let env = Env::new();
    let out = env.run_ok(&["completions", "bash"]);
    assert!(out.contains("daybook"));
}
