//! Behaviour every `NoteStore` must share. Each check uses fresh user ids so
//! it can run against a database that already holds other data.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::models::{NewNote, NotePatch};
use super::store::{DatabaseError, NoteStore};

fn user(name: &str) -> String {
    format!("{}-{}", name, Uuid::new_v4())
}

fn note(user_id: &str, title: &str, content: &str, age_secs: i64) -> NewNote {
    let mut note = NewNote::new(user_id, title, content);
    note.created_at = Utc::now() - Duration::seconds(age_secs);
    note
}

async fn titles(store: &dyn NoteStore, user_id: &str, search: &str) -> Vec<String> {
    store
        .list(user_id, search)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect()
}

pub async fn lists_newest_first_for_owner_only(store: &dyn NoteStore) {
    let alice = user("alice");
    let bob = user("bob");

    store.insert(note(&alice, "old", "", 30)).await.unwrap();
    store.insert(note(&bob, "bob's", "", 20)).await.unwrap();
    store.insert(note(&alice, "new", "", 10)).await.unwrap();
    store.insert(note(&alice, "middle", "", 20)).await.unwrap();

    assert_eq!(titles(store, &alice, "").await, vec!["new", "middle", "old"]);
    assert_eq!(titles(store, &bob, "").await, vec!["bob's"]);
    assert!(titles(store, &user("carol"), "").await.is_empty());
}

pub async fn search_matches_title_or_content(store: &dyn NoteStore) {
    let alice = user("alice");
    store.insert(note(&alice, "Groceries", "eggs", 3)).await.unwrap();
    store.insert(note(&alice, "Work", "grocery run after standup", 2)).await.unwrap();
    store.insert(note(&alice, "Gym", "legs", 1)).await.unwrap();

    assert_eq!(titles(store, &alice, "GROCER").await, vec!["Work", "Groceries"]);
    assert_eq!(titles(store, &alice, "legs").await, vec!["Gym"]);
    assert_eq!(titles(store, &alice, "gym").await, vec!["Gym"]);
    assert!(titles(store, &alice, "tax").await.is_empty());
    assert_eq!(titles(store, &alice, "").await.len(), 3);
}

pub async fn search_wildcards_are_literal(store: &dyn NoteStore) {
    let alice = user("alice");
    store.insert(note(&alice, "50% off", "", 4)).await.unwrap();
    store.insert(note(&alice, "500 items", "", 3)).await.unwrap();
    store.insert(note(&alice, "snake_case", "", 2)).await.unwrap();
    store.insert(note(&alice, "snakeXcase", "", 1)).await.unwrap();

    assert_eq!(titles(store, &alice, "0%").await, vec!["50% off"]);
    assert_eq!(titles(store, &alice, "e_c").await, vec!["snake_case"]);
    assert!(titles(store, &alice, "\\").await.is_empty());
}

pub async fn insert_starts_incomplete(store: &dyn NoteStore) {
    let alice = user("alice");
    let created = store.insert(note(&alice, "t", "c", 0)).await.unwrap();

    assert!(!created.completed);
    assert_eq!(created.user_id, alice);
    assert_eq!(store.list(&alice, "").await.unwrap(), vec![created]);
}

pub async fn partial_update_keeps_other_fields(store: &dyn NoteStore) {
    let alice = user("alice");
    let created = store.insert(note(&alice, "Buy milk", "2 liters", 0)).await.unwrap();

    let done = NotePatch { completed: Some(true), ..Default::default() };
    store.update(created.id, &alice, done).await.unwrap();
    let retitled = NotePatch { title: Some("Buy oat milk".to_string()), ..Default::default() };
    store.update(created.id, &alice, retitled).await.unwrap();
    store.update(created.id, &alice, NotePatch::default()).await.unwrap();

    let stored = &store.list(&alice, "").await.unwrap()[0];
    assert_eq!(stored.title, "Buy oat milk");
    assert_eq!(stored.content, "2 liters");
    assert!(stored.completed);
    assert_eq!(stored.created_at, created.created_at);
}

pub async fn update_and_delete_are_owner_scoped(store: &dyn NoteStore) {
    let alice = user("alice");
    let bob = user("bob");
    let created = store.insert(note(&alice, "mine", "", 0)).await.unwrap();

    let patch = NotePatch { title: Some("hacked".to_string()), ..Default::default() };
    let err = store.update(created.id, &bob, patch).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    let err = store.delete(created.id, &bob).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    assert_eq!(titles(store, &alice, "").await, vec!["mine"]);

    store.delete(created.id, &alice).await.unwrap();
    assert!(titles(store, &alice, "").await.is_empty());

    let err = store.delete(created.id, &alice).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    let err = store.update(Uuid::new_v4(), &alice, NotePatch::default()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

pub async fn ping_succeeds(store: &dyn NoteStore) {
    store.ping().await.unwrap();
}
