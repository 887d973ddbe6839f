mod common;

use anyhow::Result;
use common::{new_contact, Contact, ContactKind};
use recordkit::{InMemoryStore, RecordKind, RecordStore, StoreError};
use uuid::Uuid;

fn entity(name: &str, email: &str) -> Contact {
    ContactKind::to_entity(new_contact(name, email))
}

#[tokio::test]
async fn insert_assigns_distinct_ids_and_keeps_order() -> Result<()> {
    let store = InMemoryStore::<ContactKind>::new();
    let a = store.insert(entity("Ann", "ann@x.com")).await?;
    let b = store.insert(entity("Bob", "bob@x.com")).await?;

    assert!(!a.id.is_nil());
    assert_ne!(a.id, b.id);
    assert_eq!(store.len(), 2);

    let all = store.find_all().await?;
    assert_eq!(all, vec![a.clone(), b]);
    assert_eq!(store.find_by_email("ann@x.com").await?, Some(a));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_on_insert_and_update() -> Result<()> {
    let store = InMemoryStore::<ContactKind>::new();
    store.insert(entity("Ann", "ann@x.com")).await?;
    let bob = store.insert(entity("Bob", "bob@x.com")).await?;

    let err = store.insert(entity("Other", "ann@x.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail { email } if email == "ann@x.com"));

    let moved = Contact {
        email: "ann@x.com".into(),
        ..bob.clone()
    };
    let err = store.update(moved).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail { .. }));

    // keeping one's own email is not a conflict
    let renamed = Contact {
        name: "Robert".into(),
        ..bob
    };
    assert_eq!(store.update(renamed).await?.name, "Robert");
    Ok(())
}

#[tokio::test]
async fn update_and_delete_of_unknown_ids() -> Result<()> {
    let store = InMemoryStore::<ContactKind>::new();
    let ghost = Contact {
        id: Uuid::new_v4(),
        ..entity("Ghost", "ghost@x.com")
    };

    let err = store.update(ghost.clone()).await.unwrap_err();
    assert!(matches!(err, StoreError::Missing { id } if id == ghost.id));
    assert!(!store.delete_by_id(ghost.id).await?);
    assert!(!store.exists_by_id(ghost.id).await?);

    let ann = store.insert(entity("Ann", "ann@x.com")).await?;
    assert!(store.delete_by_id(ann.id).await?);
    assert!(!store.delete_by_id(ann.id).await?);
    assert!(store.is_empty());
    Ok(())
}
