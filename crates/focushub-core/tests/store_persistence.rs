//! Persisted state survives reopening the database file.

use focushub_core::storage::StoreKey;
use focushub_core::{Config, PersonalityType, RigidityLevel, Shell, Store};

#[test]
fn shell_writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focushub.db");

    {
        let shell = Shell::with_browser(Store::open_at(&path).unwrap(), &Config::default());
        shell.set_goal("  Finish thesis  ").unwrap();
        shell.set_rigidity(RigidityLevel::Locked).unwrap();
        shell.set_personality(PersonalityType::Savage).unwrap();
        shell.toggle_entry("5").unwrap();
        shell.record_focus_score(88).unwrap();
    }

    let store = Store::open_at(&path).unwrap();
    assert_eq!(store.goal(), "Finish thesis");
    assert_eq!(store.rigidity(), RigidityLevel::Locked);
    assert_eq!(store.personality(), PersonalityType::Savage);
    assert!(store.blocklist().find("5").unwrap().is_blocked);

    let history = store.stats().focus_history;
    assert_eq!(history.len(), 7);
    assert_eq!(history.last(), Some(&88));
}

#[test]
fn corrupt_value_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focushub.db");

    let store = Store::open_at(&path).unwrap();
    store.set(StoreKey::Rigidity, "Extreme").unwrap();
    store.set(StoreKey::Blocklist, &42).unwrap();
    drop(store);

    let store = Store::open_at(&path).unwrap();
    assert_eq!(store.rigidity(), RigidityLevel::Standard);
    assert_eq!(store.blocklist().len(), 6);
}
