use std::sync::Arc;

use rail_domain::Company;
use rail_persistence::{CompanyRepository, InMemoryCompanyRepository, PersistenceError, StoreConfig};
use uuid::Uuid;

fn named(name: &str) -> Company {
    Company { name: Some(name.to_string()),
              ..Company::new() }
}

#[test]
fn insert_assigns_id_and_timestamps() {
    let repo = InMemoryCompanyRepository::new();
    let saved = repo.save(named("Acme")).unwrap();
    assert!(saved.is_persisted());
    assert!(saved.created_at.is_some());
    assert_eq!(saved.created_at, saved.updated_at);
    assert_eq!(repo.find(saved.id.unwrap()).unwrap(), Some(saved));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn update_keeps_created_at() {
    let repo = InMemoryCompanyRepository::new();
    let saved = repo.save(named("Acme")).unwrap();
    let mut changed = saved.clone();
    changed.name = Some("Acme Widgets".into());
    let updated = repo.save(changed).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.created_at, saved.created_at);
    assert!(updated.updated_at >= saved.updated_at);
    assert_eq!(repo.count().unwrap(), 1);
    assert_eq!(repo.snapshot()[0].name.as_deref(), Some("Acme Widgets"));
}

#[test]
fn updating_unknown_id_is_not_found() {
    let repo = InMemoryCompanyRepository::new();
    let ghost = Company { id: Some(Uuid::new_v4()),
                          ..named("Ghost") };
    assert!(matches!(repo.save(ghost), Err(PersistenceError::NotFound(_))));
    assert_eq!(repo.find(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn capacity_and_read_only_are_enforced() {
    let repo = InMemoryCompanyRepository::with_config(StoreConfig { capacity: Some(1),
                                                                    read_only: false });
    repo.save(named("One")).unwrap();
    assert!(matches!(repo.save(named("Two")), Err(PersistenceError::CapacityExceeded { capacity: 1 })));

    let ro = InMemoryCompanyRepository::with_config(StoreConfig { capacity: None,
                                                                  read_only: true });
    assert!(matches!(ro.save(named("One")), Err(PersistenceError::ReadOnly)));
    assert_eq!(ro.count().unwrap(), 0);
}

#[test]
fn concurrent_inserts_are_all_kept() {
    let repo = Arc::new(InMemoryCompanyRepository::new());
    std::thread::scope(|s| {
        for i in 0..8 {
            let repo = repo.clone();
            s.spawn(move || {
                repo.save(named(&format!("Company {i}"))).unwrap();
            });
        }
    });
    assert_eq!(repo.count().unwrap(), 8);
}
