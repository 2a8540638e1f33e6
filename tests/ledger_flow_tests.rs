use chrono::NaiveDate;
use fintrack::ledger::{CategorySet, LedgerManager, Transaction, TransactionKind};
use fintrack::storage::{backup_names, FixedDepthRetention, JsonStore};
use tempfile::TempDir;
use uuid::Uuid;

fn store_in(temp: &TempDir) -> JsonStore {
    JsonStore::new(
        Some(temp.path().to_path_buf()),
        &CategorySet::default(),
        Box::<FixedDepthRetention>::default(),
    )
    .expect("json store")
}

fn expense(amount: f64, category: &str) -> Transaction {
    Transaction::new(
        TransactionKind::Expense,
        amount,
        category,
        "",
        Some(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()),
    )
    .unwrap()
}

#[test]
fn mutations_flush_immediately() {
    let temp = TempDir::new().unwrap();
    let mut manager = LedgerManager::new(store_in(&temp));
    let keep = manager.add_transaction(expense(12.0, "Food")).unwrap();
    let drop = manager.add_transaction(expense(30.0, "Bills")).unwrap();

    // Another manager over the same directory sees both adds without an
    // explicit save.
    let mut observer = LedgerManager::new(store_in(&temp));
    assert_eq!(observer.load().loaded, 2);

    assert!(manager.delete_transaction(drop));
    let mut observer = LedgerManager::new(store_in(&temp));
    observer.load();
    let remaining = observer.ledger().all();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);
}

#[test]
fn deleting_an_absent_id_neither_mutates_nor_flushes() {
    let temp = TempDir::new().unwrap();
    let mut manager = LedgerManager::new(store_in(&temp));
    manager.add_transaction(expense(5.0, "Food")).unwrap();

    let backups_before =
        backup_names(manager.store().backups_dir(), manager.store().records_file_name())
            .unwrap()
            .len();
    assert!(!manager.delete_transaction(Uuid::new_v4()));
    assert_eq!(manager.ledger().len(), 1);
    let backups_after =
        backup_names(manager.store().backups_dir(), manager.store().records_file_name())
            .unwrap()
            .len();
    assert_eq!(backups_before, backups_after);
}

#[test]
fn load_replaces_previous_in_memory_state() {
    let temp = TempDir::new().unwrap();
    let mut manager = LedgerManager::new(store_in(&temp));
    manager.add_transaction(expense(5.0, "Food")).unwrap();

    // Stale in-memory state is dropped wholesale on reload.
    let mut other = LedgerManager::new(store_in(&temp));
    other.load();
    other.delete_transaction(other.ledger().all()[0].id);

    manager.load();
    assert!(manager.ledger().is_empty());
}
