//! Integration tests for curfew
//!
//! These drive the store, engine, synthesizer and hosts file lifecycle
//! together against temporary files.

use chrono::{DateTime, Local, TimeZone};
use curfew_api::{FieldKind, PolicyDocument};
use curfew_config::parse_config;
use curfew_core::{blocked_domains, is_group_live, HostsSynthesizer, PolicyEngine};
use curfew_host_api::MockCacheFlusher;
use curfew_host_unix::HostsFiles;
use curfew_store::{JsonStore, PolicyStore};
use curfew_util::{CurfewError, GroupName};
use std::fs;
use tempfile::TempDir;

const TEMPLATE: &str = "127.0.0.1\tlocalhost\n::1\tlocalhost\n";

struct Harness {
    _dir: TempDir,
    store: JsonStore,
    files: HostsFiles,
    synth: HostsSynthesizer,
    flusher: MockCacheFlusher,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hosts"), TEMPLATE).unwrap();

        let settings = parse_config(&format!(
            r#"
                config_version = 1

                [hosts]
                file = "{0}/hosts"
                original = "{0}/hosts.original"
                template = "{0}/hosts.template"
                blackhole = "127.0.0.250"

                [store]
                path = "{0}/data/curfew.json"
            "#,
            dir.path().display()
        ))
        .unwrap();

        Self {
            store: JsonStore::new(&settings.store_path),
            files: HostsFiles::new(
                &settings.hosts.live,
                &settings.hosts.original,
                &settings.hosts.template,
            ),
            synth: HostsSynthesizer::new(settings.hosts.blackhole),
            flusher: MockCacheFlusher::new(),
            _dir: dir,
        }
    }

    fn engine(&self) -> PolicyEngine {
        PolicyEngine::new(self.store.load().unwrap())
    }

    fn commit(&self, engine: PolicyEngine) {
        self.store.save(&engine.into_document()).unwrap();
    }

    /// Bootstrap, synthesize, render and apply; returns the written file.
    fn regenerate(&self, now: &DateTime<Local>) -> String {
        self.files.ensure_bootstrap().unwrap();
        let template = self.files.read_template().unwrap();
        let document = self.store.load().unwrap();
        let content = self
            .files
            .render(&template, &self.synth.synthesize(&document, now));
        self.files.apply(&content, &self.flusher).unwrap();
        fs::read_to_string(self.files.live()).unwrap()
    }
}

fn monday_at(hour: u32) -> DateTime<Local> {
    // 2025-12-29 is a Monday
    Local.with_ymd_and_hms(2025, 12, 29, hour, 0, 0).unwrap()
}

fn work() -> GroupName {
    GroupName::new("work")
}

fn setup_work_group(harness: &Harness) {
    let mut engine = harness.engine();
    engine.add_domain(&work(), "example.com").unwrap();
    engine.add_domain(&work(), "foo.com").unwrap();
    engine.add_hour(&work(), "9-17").unwrap();
    engine.add_day(&work(), "Monday").unwrap();
    engine.add_day(&work(), "Tuesday").unwrap();
    harness.commit(engine);
}

#[test]
fn test_first_run_initializes_store() {
    let harness = Harness::new();
    let document = harness.store.load().unwrap();
    assert_eq!(document, PolicyDocument::initial());
    assert!(harness.store.path().exists());
}

#[test]
fn test_work_hours_scenario() {
    let harness = Harness::new();
    setup_work_group(&harness);

    let document = harness.store.load().unwrap();
    assert!(is_group_live(&document, &work(), &monday_at(10)));
    assert_eq!(
        blocked_domains(&document, &monday_at(10)),
        vec!["example.com", "foo.com"]
    );

    let hosts = harness.regenerate(&monday_at(10));
    assert!(hosts.starts_with(TEMPLATE));
    assert!(hosts.ends_with("##\n\n127.0.0.250\texample.com\n127.0.0.250\tfoo.com"));
    assert_eq!(harness.flusher.flush_count(), 1);

    assert!(!is_group_live(&document, &work(), &monday_at(17)));
    let hosts = harness.regenerate(&monday_at(17));
    assert!(hosts.ends_with("##\n"));
    assert!(!hosts.contains("example.com"));
}

#[test]
fn test_regeneration_is_idempotent() {
    let harness = Harness::new();
    setup_work_group(&harness);

    let first = harness.regenerate(&monday_at(10));
    let second = harness.regenerate(&monday_at(10));
    assert_eq!(first, second);
}

#[test]
fn test_bootstrap_keeps_original_and_template() {
    let harness = Harness::new();
    setup_work_group(&harness);
    harness.regenerate(&monday_at(10));

    // The live file now carries generated lines; backup and template do not
    assert_eq!(fs::read_to_string(harness.files.original()).unwrap(), TEMPLATE);
    assert_eq!(fs::read_to_string(harness.files.template()).unwrap(), TEMPLATE);

    // Template edits show up in the next regeneration
    fs::write(harness.files.template(), "10.0.0.1\tnas\n").unwrap();
    let hosts = harness.regenerate(&monday_at(10));
    assert!(hosts.starts_with("10.0.0.1\tnas\n\n##\n"));
    assert_eq!(fs::read_to_string(harness.files.original()).unwrap(), TEMPLATE);
}

#[test]
fn test_shared_domain_is_written_once() {
    let harness = Harness::new();
    let mut engine = harness.engine();
    engine.add_domain(&work(), "example.com").unwrap();
    engine
        .add_domain(&GroupName::default_group(), "HTTP://Example.com")
        .unwrap();
    harness.commit(engine);

    let hosts = harness.regenerate(&monday_at(3));
    assert_eq!(hosts.matches("example.com").count(), 1);
}

#[test]
fn test_emptied_hours_stop_blocking() {
    let harness = Harness::new();
    setup_work_group(&harness);

    let mut engine = harness.engine();
    engine.empty_field(&work(), FieldKind::Hours).unwrap();
    harness.commit(engine);

    let document = harness.store.load().unwrap();
    assert!(document.group(&work()).unwrap().hours.values().is_empty());
    for hour in 0..24 {
        assert!(!is_group_live(&document, &work(), &monday_at(hour)));
    }
    assert!(!harness.regenerate(&monday_at(10)).contains("example.com"));
}

#[test]
fn test_deactivated_group_is_excluded() {
    let harness = Harness::new();
    setup_work_group(&harness);

    let mut engine = harness.engine();
    engine.deactivate(&work());
    harness.commit(engine);

    let document = harness.store.load().unwrap();
    assert!(is_group_live(&document, &work(), &monday_at(10)));
    assert!(blocked_domains(&document, &monday_at(10)).is_empty());
}

#[test]
fn test_remove_missing_group_leaves_store_unchanged() {
    let harness = Harness::new();
    setup_work_group(&harness);
    let before = fs::read_to_string(harness.store.path()).unwrap();

    let mut engine = harness.engine();
    let result = engine.remove_group(&GroupName::new("ghost"));
    assert!(matches!(result, Err(CurfewError::NotFound(_))));

    assert_eq!(fs::read_to_string(harness.store.path()).unwrap(), before);
}

#[test]
fn test_persisted_document_shape() {
    let harness = Harness::new();
    setup_work_group(&harness);

    let raw = fs::read_to_string(harness.store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["active"], serde_json::json!(["default", "work"]));
    assert_eq!(value["groups"]["work"]["hours"], serde_json::json!(["9-17"]));
    assert_eq!(
        value["groups"]["work"]["days"],
        serde_json::json!(["Monday", "Tuesday"])
    );
    assert_eq!(value["groups"]["default"]["hours"], serde_json::json!(["*"]));
}

#[test]
fn test_missing_hosts_file_is_missing_resource() {
    let harness = Harness::new();
    fs::remove_file(harness.files.live()).unwrap();

    let err: CurfewError = harness.files.ensure_bootstrap().unwrap_err().into();
    assert!(matches!(err, CurfewError::MissingResource { .. }));
    assert!(err.is_fatal());
}
