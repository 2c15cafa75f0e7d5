// Integration tests for the `VisibilityToggler` state machine.

mod common;

use common::MockDirectory;

use dirbook_api::FilterBuilder;
use dirbook_core::{CoreError, DirectoryConfig, ToggleOutcome, VisibilityToggler};

const ALICE_DN: &str = "uid=asmith,ou=users,dc=example,dc=com";
const DEVS_DN: &str = "cn=devs,ou=groups,dc=example,dc=com";

fn login_filter(mail: &str) -> String {
    format!("(&(objectClass=inetOrgPerson)(mail={mail}))")
}

fn gid_filter(gid: &str) -> String {
    format!("(&(objectClass=posixGroup)(gidNumber={gid}))")
}

fn setup() -> (DirectoryConfig, FilterBuilder) {
    let config = DirectoryConfig::default();
    let filters = config.filter_builder().expect("default templates are valid");
    (config, filters)
}

fn seed_alice(dir: &MockDirectory) {
    dir.insert_entry(
        ALICE_DN,
        &[
            ("objectClass", &["top", "person", "inetOrgPerson"]),
            ("uid", &["asmith"]),
            ("mail", &["alice@example.com"]),
        ],
    );
    dir.route(&login_filter("alice@example.com"), &[ALICE_DN]);
}

fn seed_devs_without_uid(dir: &MockDirectory) {
    dir.insert_entry(
        DEVS_DN,
        &[
            ("objectClass", &["top", "posixGroup"]),
            ("cn", &["devs"]),
            ("gidnumber", &["5000"]),
        ],
    );
    dir.route(&gid_filter("5000"), &[DEVS_DN]);
}

// ── User transitions ────────────────────────────────────────────────

#[tokio::test]
async fn test_hide_user_appends_marker() {
    let dir = MockDirectory::new();
    seed_alice(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let outcome = toggler.hide_user("alice@example.com").await.expect("hide succeeds");

    assert_eq!(outcome, ToggleOutcome::Applied);
    assert_eq!(
        dir.attr_values(ALICE_DN, "objectclass"),
        ["top", "person", "inetOrgPerson", "shadowAccount"]
    );
}

#[tokio::test]
async fn test_hide_user_twice_is_noop() {
    let dir = MockDirectory::new();
    seed_alice(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    assert_eq!(
        toggler.hide_user("alice@example.com").await.expect("first hide"),
        ToggleOutcome::Applied
    );
    assert_eq!(
        toggler.hide_user("alice@example.com").await.expect("second hide"),
        ToggleOutcome::Unchanged
    );

    // No duplicate marker, and only the first call wrote anything.
    assert_eq!(
        dir.attr_values(ALICE_DN, "objectclass")
            .iter()
            .filter(|c| *c == "shadowAccount")
            .count(),
        1
    );
    assert_eq!(dir.modify_log().len(), 1);
}

#[tokio::test]
async fn test_hide_then_show_restores_object_classes() {
    let dir = MockDirectory::new();
    seed_alice(&dir);
    let original = dir.attr_values(ALICE_DN, "objectclass");
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    toggler.hide_user("alice@example.com").await.expect("hide succeeds");
    let outcome = toggler.show_user("alice@example.com").await.expect("show succeeds");

    assert_eq!(outcome, ToggleOutcome::Applied);
    assert_eq!(dir.attr_values(ALICE_DN, "objectclass"), original);
}

#[tokio::test]
async fn test_show_visible_user_is_noop() {
    let dir = MockDirectory::new();
    seed_alice(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let outcome = toggler.show_user("alice@example.com").await.expect("show succeeds");

    assert_eq!(outcome, ToggleOutcome::Unchanged);
    assert!(dir.modify_log().is_empty());
}

#[tokio::test]
async fn test_hide_unknown_user_reports_not_found() {
    let dir = MockDirectory::new();
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let result = toggler.hide_user("nobody@example.com").await;

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_hide_ambiguous_identity_reports_not_found() {
    let dir = MockDirectory::new();
    seed_alice(&dir);
    dir.insert_entry(
        "uid=asmith2,ou=users,dc=example,dc=com",
        &[("objectClass", &["inetOrgPerson"])],
    );
    dir.route(
        &login_filter("dup@example.com"),
        &[ALICE_DN, "uid=asmith2,ou=users,dc=example,dc=com"],
    );
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let result = toggler.hide_user("dup@example.com").await;

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
    assert!(dir.modify_log().is_empty());
}

// ── Group transitions ───────────────────────────────────────────────

#[tokio::test]
async fn test_hide_group_provisions_synthetic_uid() {
    let dir = MockDirectory::new();
    seed_devs_without_uid(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let outcome = toggler.hide_group("5000").await.expect("hide succeeds");

    assert_eq!(outcome, ToggleOutcome::Applied);
    assert_eq!(dir.attr_values(DEVS_DN, "uid"), ["groupdevs"]);
    assert!(
        dir.attr_values(DEVS_DN, "objectclass")
            .contains(&"shadowAccount".to_string())
    );

    // Marker and synthetic uid land in the same modify call.
    let modifies = dir.modify_log();
    assert_eq!(modifies.len(), 1);
    assert_eq!(modifies[0].1.len(), 2);
}

#[tokio::test]
async fn test_hide_group_keeps_existing_uid() {
    let dir = MockDirectory::new();
    dir.insert_entry(
        DEVS_DN,
        &[
            ("objectClass", &["posixGroup"]),
            ("cn", &["devs"]),
            ("gidnumber", &["5000"]),
            ("uid", &["legacygroup"]),
        ],
    );
    dir.route(&gid_filter("5000"), &[DEVS_DN]);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    toggler.hide_group("5000").await.expect("hide succeeds");

    assert_eq!(dir.attr_values(DEVS_DN, "uid"), ["legacygroup"]);
}

#[tokio::test]
async fn test_show_group_removes_marker_and_clears_uid() {
    let dir = MockDirectory::new();
    seed_devs_without_uid(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    toggler.hide_group("5000").await.expect("hide succeeds");
    let outcome = toggler.show_group("5000").await.expect("show succeeds");

    assert_eq!(outcome, ToggleOutcome::Applied);
    assert_eq!(dir.attr_values(DEVS_DN, "objectclass"), ["top", "posixGroup"]);
    assert!(!dir.has_attr(DEVS_DN, "uid"));
}

#[tokio::test]
async fn test_show_group_twice_is_noop() {
    let dir = MockDirectory::new();
    seed_devs_without_uid(&dir);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    toggler.hide_group("5000").await.expect("hide succeeds");
    toggler.show_group("5000").await.expect("first show succeeds");

    let before = dir.modify_log().len();
    let outcome = toggler.show_group("5000").await.expect("second show succeeds");

    assert_eq!(outcome, ToggleOutcome::Unchanged);
    assert_eq!(dir.modify_log().len(), before);
}

#[tokio::test]
async fn test_synthetic_uid_collision_is_reported() {
    let dir = MockDirectory::new();
    seed_devs_without_uid(&dir);
    // Another group already bears the identifier the hide would provision.
    dir.insert_entry(
        "cn=shadowed,ou=groups,dc=example,dc=com",
        &[
            ("objectClass", &["posixGroup", "shadowAccount"]),
            ("cn", &["shadowed"]),
            ("uid", &["groupdevs"]),
        ],
    );
    dir.route("(uid=groupdevs)", &["cn=shadowed,ou=groups,dc=example,dc=com"]);
    let (config, filters) = setup();
    let toggler = VisibilityToggler::new(&dir, &config, &filters);

    let result = toggler.hide_group("5000").await;

    assert!(matches!(result, Err(CoreError::Conflict { .. })));
    assert!(dir.modify_log().is_empty());
    assert!(!dir.has_attr(DEVS_DN, "uid"));
}
