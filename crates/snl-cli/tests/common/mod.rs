//! Shared E2E test helpers for `snl` binary tests.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for one CLI invocation.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

pub const GUILD: &str = "100";
pub const HOST: u64 = 900;
pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;

/// Environment variables that would leak the caller's setup into a test.
const SNL_VARS: &[&str] = &[
    "SNL_DEBUG",
    "SNL_TIMEZONE",
    "SNL_LOOKUP_TIMEOUT_MS",
    "SNL_STATE_PATH",
    "SNL_BOARD_PATH",
    "SNL_GUILD",
    "SNL_MEMBER",
    "RUST_LOG",
];

/// A game directory with a project config and a 100-tile board.
///
/// ```text
/// <tmp>/
/// ├── .snl/config.toml   (host 900, players 1 and 2)
/// ├── board.toml         (ladder 97 → 55)
/// └── state.json         (created by the first write)
/// ```
pub struct GameDir {
    dir: tempfile::TempDir,
}

impl GameDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir for game");

        let config_dir = dir.path().join(".snl");
        std::fs::create_dir_all(&config_dir).expect("create config dir");
        std::fs::write(
            config_dir.join("config.toml"),
            format!("[roles]\nhosts = [{HOST}]\nplayers = [{ALICE}, {BOB}]\n"),
        )
        .expect("write config");

        let mut board = String::new();
        for n in 1..=100 {
            let _ = write!(
                board,
                "[[tiles]]\ntile = {n}\ntask = \"Task {n}\"\ntarget = \"Target {n}\"\n"
            );
            if n == 97 {
                board.push_str("type = \"Ladder\"\nend_tile = 55\n");
            }
            board.push('\n');
        }
        std::fs::write(dir.path().join("board.toml"), board).expect("write board");

        Self { dir }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    pub fn board_path(&self) -> PathBuf {
        self.dir.path().join("board.toml")
    }

    /// Builds a command in this game, acting as `member` in [`GUILD`].
    pub fn cmd(&self, member: u64) -> assert_cmd::Command {
        let mut cmd = self.cmd_raw();
        cmd.args(["--guild", GUILD, "--as", &member.to_string()]);
        cmd
    }

    /// Builds a command in this game without guild or member.
    pub fn cmd_raw(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("snl");
        cmd.timeout(TIMEOUT_BASIC);
        for var in SNL_VARS {
            cmd.env_remove(var);
        }
        cmd.arg("-C")
            .arg(self.dir.path())
            .arg("--skip-global-config")
            .arg("--state")
            .arg(self.state_path())
            .arg("--board")
            .arg(self.board_path());
        cmd
    }

    /// Reads the saved game state as JSON.
    pub fn state(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.state_path()).expect("read state file");
        serde_json::from_str(&text).expect("state file is JSON")
    }

    /// Returns a player's saved record in [`GUILD`].
    pub fn player(&self, player: u64) -> serde_json::Value {
        self.state()["guilds"][GUILD]["players"][player.to_string()].clone()
    }
}

/// Runs a command that must succeed and returns its stdout.
pub fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is UTF-8")
}
