use chrono::Utc;
use doc_uploader::journal::{OrphanJournal, OrphanRecord};
use doc_uploader::naming::StorageKey;

fn test_journal() -> (tempfile::TempDir, OrphanJournal) {
    let dir = tempfile::tempdir().unwrap();
    let journal = OrphanJournal::open(dir.path().join("data")).unwrap();
    (dir, journal)
}

fn sample_orphan(key: &str) -> OrphanRecord {
    OrphanRecord {
        key: StorageKey::from_raw(key),
        canonical_url: format!("https://team-docs.s3.amazonaws.com/{key}"),
        owner_identity: "alice@example.com".to_string(),
        content_type: "application/pdf".to_string(),
        byte_size: 2048,
        orphaned_at: Utc::now(),
        reason: "Persistence error: document creation failed (500)".to_string(),
    }
}

#[test]
fn test_record_and_get_orphan() {
    let (_dir, journal) = test_journal();
    let orphan = sample_orphan("alice@example.com-1-report.pdf");

    journal.record_orphan(&orphan).unwrap();

    let retrieved = journal
        .get_orphan(&orphan.key)
        .unwrap()
        .expect("orphan should exist");
    assert_eq!(retrieved, orphan);
}

#[test]
fn test_get_orphan_not_found() {
    let (_dir, journal) = test_journal();
    let key = StorageKey::from_raw("missing");
    assert!(journal.get_orphan(&key).unwrap().is_none());
}

#[test]
fn test_list_orphans_ordered_by_key() {
    let (_dir, journal) = test_journal();
    journal.record_orphan(&sample_orphan("c-3-z.pdf")).unwrap();
    journal.record_orphan(&sample_orphan("a-1-x.pdf")).unwrap();
    journal.record_orphan(&sample_orphan("b-2-y.pdf")).unwrap();

    let keys: Vec<String> = journal
        .list_orphans()
        .unwrap()
        .into_iter()
        .map(|o| o.key.to_string())
        .collect();
    assert_eq!(keys, vec!["a-1-x.pdf", "b-2-y.pdf", "c-3-z.pdf"]);
}

#[test]
fn test_record_same_key_replaces_entry() {
    let (_dir, journal) = test_journal();
    let mut orphan = sample_orphan("a-1-x.pdf");
    journal.record_orphan(&orphan).unwrap();

    orphan.reason = "second failure".to_string();
    journal.record_orphan(&orphan).unwrap();

    let all = journal.list_orphans().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].reason, "second failure");
}

#[test]
fn test_remove_orphan() {
    let (_dir, journal) = test_journal();
    let orphan = sample_orphan("a-1-x.pdf");
    journal.record_orphan(&orphan).unwrap();

    assert!(journal.remove_orphan(&orphan.key).unwrap());
    assert!(journal.get_orphan(&orphan.key).unwrap().is_none());
    assert!(!journal.remove_orphan(&orphan.key).unwrap());
}

#[test]
fn test_purge_all() {
    let (_dir, journal) = test_journal();
    journal.record_orphan(&sample_orphan("a-1-x.pdf")).unwrap();
    journal.record_orphan(&sample_orphan("b-2-y.pdf")).unwrap();

    let stats = journal.purge_all().unwrap();
    assert_eq!(stats.orphans, 2);
    assert!(journal.list_orphans().unwrap().is_empty());
}

#[test]
fn test_journal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let orphan = sample_orphan("a-1-x.pdf");
    {
        let journal = OrphanJournal::open(dir.path()).unwrap();
        journal.record_orphan(&orphan).unwrap();
    }

    let journal = OrphanJournal::open(dir.path()).unwrap();
    assert_eq!(journal.list_orphans().unwrap(), vec![orphan]);
}
