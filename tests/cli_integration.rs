//! Integration tests for the Kee CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master key is passed through `KEE_MASTER_KEY` and destructive commands
//! use `--force`, so nothing waits on an interactive prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const KEY: &str = "correct horse battery";

/// Helper: a Command for the kee binary with a clean environment.
fn kee() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("kee").expect("binary should exist");
    cmd.env_remove("KEE_VAULT")
        .env_remove("KEE_CONFIG_DIR")
        .env_remove("KEE_MASTER_KEY")
        .env_remove("KEE_NEW_MASTER_KEY")
        .env_remove("KEE_LOG");
    cmd
}

/// Helper: a Command bound to `<tmp>/vault.kee` and `<tmp>/config`.
fn kee_in(tmp: &TempDir) -> Command {
    let mut cmd = kee();
    cmd.env("KEE_VAULT", tmp.child("vault.kee").path())
        .env("KEE_CONFIG_DIR", tmp.child("config").path())
        .env("KEE_MASTER_KEY", KEY);
    cmd
}

/// Helper: create a vault with one password group holding one login.
fn seeded() -> TempDir {
    let tmp = TempDir::new().unwrap();
    kee_in(&tmp).args(["create", "Personal"]).assert().success();
    kee_in(&tmp)
        .args(["group", "add", "Web", "password"])
        .assert()
        .success();
    kee_in(&tmp)
        .args([
            "item",
            "add",
            "Web",
            "-f",
            "url=https://example.com",
            "-f",
            "login=octo",
            "-f",
            "password=hunter22",
        ])
        .assert()
        .success();
    tmp
}

// ---------------------------------------------------------------------------
// Help and usage
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    kee()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted credential vault"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("item"))
        .stdout(predicate::str::contains("rotate-key"))
        .stdout(predicate::str::contains("strategy"))
        .stdout(predicate::str::contains("bookmarks"));
}

#[test]
fn version_flag_shows_version() {
    kee()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kee"));
}

#[test]
fn no_args_shows_help() {
    kee()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_vault_selection_is_reported() {
    let tmp = TempDir::new().unwrap();
    kee()
        .env("KEE_CONFIG_DIR", tmp.path())
        .env("KEE_MASTER_KEY", KEY)
        .arg("groups")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--vault"));
}

// ---------------------------------------------------------------------------
// Vault lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_writes_the_vault_and_bookmarks_it() {
    let tmp = TempDir::new().unwrap();
    kee_in(&tmp)
        .args(["create", "Personal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vault 'Personal'"));

    tmp.child("vault.kee").assert(predicate::path::exists());
    tmp.child("config/bookmarks.toml")
        .assert(predicate::str::contains("vault.kee"));
}

#[test]
fn create_refuses_an_existing_vault() {
    let tmp = seeded();
    kee_in(&tmp)
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_rejects_short_master_keys() {
    let tmp = TempDir::new().unwrap();
    kee_in(&tmp)
        .env("KEE_MASTER_KEY", "short")
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
    tmp.child("vault.kee").assert(predicate::path::missing());
}

#[test]
fn create_rejects_unknown_strategies() {
    let tmp = TempDir::new().unwrap();
    kee_in(&tmp)
        .args(["create", "--cipher", "ROT13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROT13"));
}

#[test]
fn wrong_master_key_fails() {
    let tmp = seeded();
    kee_in(&tmp)
        .env("KEE_MASTER_KEY", "definitely wrong")
        .arg("groups")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn info_shows_metadata() {
    let tmp = seeded();
    kee_in(&tmp)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal"))
        .stdout(predicate::str::contains("SHA256"))
        .stdout(predicate::str::contains("AES-CBC"))
        .stdout(predicate::str::contains("Base64"));
}

#[test]
fn rename_changes_the_display_name() {
    let tmp = seeded();
    kee_in(&tmp).args(["rename", "Work"]).assert().success();
    kee_in(&tmp)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work"));
}

#[test]
fn destroy_removes_file_and_bookmark() {
    let tmp = seeded();
    kee_in(&tmp).args(["destroy", "--force"]).assert().success();

    tmp.child("vault.kee").assert(predicate::path::missing());
    tmp.child("config/bookmarks.toml")
        .assert(predicate::str::contains("vault.kee").not());
}

// ---------------------------------------------------------------------------
// Groups and items
// ---------------------------------------------------------------------------

#[test]
fn groups_lists_kinds_and_counts() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["group", "add", "Cards", "cards"])
        .assert()
        .success();
    kee_in(&tmp)
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("Web"))
        .stdout(predicate::str::contains("Password"))
        .stdout(predicate::str::contains("Cards"))
        .stdout(predicate::str::contains("Card"));
}

#[test]
fn duplicate_group_is_rejected() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["group", "add", "Web", "identity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn unknown_kind_is_rejected() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["group", "add", "Wallets", "wallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown item kind"));
}

#[test]
fn items_are_masked_unless_revealed() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["items", "Web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo"))
        .stdout(predicate::str::contains("hunter22").not());

    kee_in(&tmp)
        .args(["item", "show", "Web", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter22"));
}

#[test]
fn item_add_validates_fields() {
    let tmp = seeded();
    kee_in(&tmp)
        .args([
            "item",
            "add",
            "Web",
            "-f",
            "url=not a url",
            "-f",
            "login=me",
            "-f",
            "password=pw",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("url"));

    kee_in(&tmp)
        .args(["item", "add", "Web", "-f", "url=https://a.io"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("login"));
}

#[test]
fn item_add_can_generate_the_password() {
    let tmp = seeded();
    kee_in(&tmp)
        .args([
            "item",
            "add",
            "Web",
            "--generate",
            "-f",
            "url=https://b.io",
            "-f",
            "login=me",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added item #2"));
}

#[test]
fn item_set_updates_one_field() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["item", "set", "Web", "1", "notes", "rotated in march"])
        .assert()
        .success();
    kee_in(&tmp)
        .args(["item", "show", "Web", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rotated in march"));
}

#[test]
fn item_set_rejects_unknown_fields() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["item", "set", "Web", "1", "cvv", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cvv"));
}

#[test]
fn item_delete_removes_the_item() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["item", "delete", "Web", "1", "--force"])
        .assert()
        .success();
    kee_in(&tmp)
        .args(["items", "Web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("empty"));
}

#[test]
fn group_rename_and_delete() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["group", "rename", "Web", "Sites"])
        .assert()
        .success();
    kee_in(&tmp)
        .args(["items", "Sites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo"));

    kee_in(&tmp)
        .args(["group", "delete", "Sites", "--force"])
        .assert()
        .success();
    kee_in(&tmp)
        .args(["items", "Sites"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// Keys and strategies
// ---------------------------------------------------------------------------

#[test]
fn rotate_key_switches_the_master_key() {
    let tmp = seeded();
    kee_in(&tmp)
        .env("KEE_NEW_MASTER_KEY", "a brand new key")
        .arg("rotate-key")
        .assert()
        .success();

    kee_in(&tmp).arg("groups").assert().failure();
    kee_in(&tmp)
        .env("KEE_MASTER_KEY", "a brand new key")
        .args(["items", "Web", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter22"));
}

#[test]
fn strategy_change_keeps_items_readable() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["strategy", "--hasher", "SHA512", "--encoder", "Base32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SHA512"));

    kee_in(&tmp)
        .args(["items", "Web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo"));
}

#[test]
fn legacy_hasher_cannot_be_selected() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["strategy", "--hasher", "SHA1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insecure"));
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_a_password_of_the_requested_length() {
    let tmp = TempDir::new().unwrap();
    kee()
        .env("KEE_CONFIG_DIR", tmp.path())
        .args(["generate", "--length", "32", "--alphanumeric"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9]{32}\n$").unwrap());
}

#[test]
fn generate_uses_the_configured_length() {
    let tmp = TempDir::new().unwrap();
    tmp.child("kee.toml")
        .write_str("password_length = 12\n")
        .unwrap();
    kee()
        .env("KEE_CONFIG_DIR", tmp.path())
        .args(["generate", "--alphanumeric"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9]{12}\n$").unwrap());
}

#[test]
fn bookmarks_list_add_remove() {
    let tmp = seeded();
    kee_in(&tmp)
        .args(["bookmarks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal"));

    let vault = tmp.child("vault.kee");
    kee_in(&tmp)
        .args(["bookmarks", "remove"])
        .arg(vault.path())
        .assert()
        .success();
    kee_in(&tmp)
        .args(["bookmarks", "remove"])
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    kee_in(&tmp).args(["bookmarks", "add"]).assert().success();
    kee_in(&tmp)
        .args(["bookmarks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault.kee"));
}

#[test]
fn completions_for_bash() {
    kee()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rotate-key"));
}

#[test]
fn completions_reject_unknown_shell() {
    kee()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'csh'"));
}
