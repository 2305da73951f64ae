use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FOOTER: &str = "Thanks for shopping with us. We hope to see you again soon. \
    Questions about your order? Visit Your Orders to view or manage your \
    purchases and track returns at any time.";

fn basket(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("basket").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn initialized() -> (TempDir, std::path::PathBuf) {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data");
    basket(home.path())
        .args(["init", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized basket"));
    (home, data)
}

fn write_order_mail(dir: &Path, name: &str, id: &str, total: &str) {
    let body = format!(
        "Your delivery is complete. delivery time: Tue Jan 5, 2021 at 3:04pm \
         Grand total: {total} Details Order {id} {FOOTER}"
    );
    let content = format!(
        "From: Shop <order-update@amazon.com>\r\nTo: me@example.com\r\n\
         Subject: Your delivery is complete\r\nDate: Tue, 05 Jan 2021 10:00:00 +0000\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\r\n{body}\r\n"
    );
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    basket(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("cursor"));
}

#[test]
fn init_creates_store_and_status_reports_it() {
    let (home, data) = initialized();
    assert!(data.join("basket.db").exists());
    assert!(data.join("mail").is_dir());
    assert!(data.join("exports").is_dir());

    basket(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Orders:       0"))
        .stdout(predicate::str::contains("Last update:  2021-Jan-01"));
}

#[test]
fn cursor_can_be_moved() {
    let (home, _data) = initialized();
    basket(home.path())
        .args(["cursor", "--set", "2021-Jan-05"])
        .assert()
        .success();
    basket(home.path())
        .arg("cursor")
        .assert()
        .success()
        .stdout(predicate::str::contains("2021-Jan-05"))
        .stdout(predicate::str::contains("after:2021/01/05"));

    basket(home.path())
        .args(["cursor", "--set", "2021-Foo-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn orders_on_empty_store() {
    let (home, _data) = initialized();
    basket(home.path())
        .arg("orders")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orders match"));
}

#[test]
fn invalid_limit_fails() {
    let (home, _data) = initialized();
    basket(home.path())
        .args(["orders", "--limit", "ten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn dry_run_writes_nothing() {
    let (home, data) = initialized();
    write_order_mail(&data.join("mail"), "1.eml", "112-7000001-1234567", "$23.45");

    basket(home.path())
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("112-7000001-1234567"))
        .stdout(predicate::str::contains("Dry run: nothing written."));

    basket(home.path())
        .arg("orders")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orders match"));
}

#[test]
fn sync_stores_orders_and_export_writes_them() {
    let (home, data) = initialized();
    write_order_mail(&data.join("mail"), "1.eml", "112-7000001-1234567", "$23.45");

    basket(home.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete"));
    assert!(data.join("orders.json").exists());

    basket(home.path())
        .args(["orders", "--from", "2021-01-01", "--to", "2021-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("112-7000001-1234567"))
        .stdout(predicate::str::contains("1 orders"));

    let out = home.path().join("out.csv");
    basket(home.path())
        .args(["export", "--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success();
    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.contains("112-7000001-1234567"));

    // A second sync sees nothing new.
    basket(home.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 messages listed"));
}
