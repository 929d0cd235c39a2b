use chrono::Duration;
use storage::Storage;
use storage::repository::{UserRecord, UserRepository, WordStatusRepository};
use storage::sqlite::SqliteRepository;
use vocab_core::Clock;
use vocab_core::model::{GroupId, Outcome, Statistics, StudyStatus, UserKey, WordId, WordRecord};
use vocab_core::time::{fixed_clock, fixed_now};

fn word(id: &str, group: GroupId) -> WordRecord {
    WordRecord::new(WordId::new(id), format!("word {id}"), format!("meaning {id}"), group)
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_store_keeps_status_and_starred_rows_apart() {
    let storage = Storage::sqlite("sqlite:file:memdb_rows?mode=memory&cache=shared")
        .await
        .expect("storage");
    let alice = UserKey::new("alice").unwrap();
    let store = storage.open(alice, fixed_clock()).await.expect("open");

    let w = word("4_2", GroupId::Day(4));
    store.put_status(&w, Outcome::Unknown).await.unwrap();
    store.put_starred(&w).await.unwrap();
    store.put_status(&w, Outcome::Known).await.unwrap();

    assert_eq!(store.get_status(&w.id).await.unwrap(), StudyStatus::Known);
    assert!(store.is_starred(&w.id).await.unwrap());

    let starred = store.list_by_status(StudyStatus::Starred).await.unwrap();
    assert_eq!(starred.len(), 1);
    assert_eq!(starred[0].id, w.id);
    assert_eq!(starred[0].group, GroupId::Day(4));
    assert_eq!(starred[0].meaning, "meaning 4_2");

    store.remove_starred(&w.id).await.unwrap();
    assert!(!store.is_starred(&w.id).await.unwrap());
    assert_eq!(store.get_status(&w.id).await.unwrap(), StudyStatus::Known);
}

#[tokio::test]
async fn sqlite_aggregate_and_recent_first_listing() {
    let storage = Storage::sqlite("sqlite:file:memdb_aggregate?mode=memory&cache=shared")
        .await
        .expect("storage");
    let user = UserKey::new("bob").unwrap();
    let mut clock = fixed_clock();

    let outcomes = [
        ("1_1", Outcome::Known),
        ("1_2", Outcome::Known),
        ("1_3", Outcome::Learned),
        ("1_4", Outcome::Unknown),
        ("olympic_3", Outcome::Unknown),
    ];
    for (id, outcome) in outcomes {
        let store = storage.open(user.clone(), clock).await.unwrap();
        let group = if id.starts_with("olympic") {
            GroupId::Supplementary
        } else {
            GroupId::Day(1)
        };
        store.put_status(&word(id, group), outcome).await.unwrap();
        clock.advance(Duration::minutes(1));
    }
    let store = storage.open(user, clock).await.unwrap();
    store.put_starred(&word("1_1", GroupId::Day(1))).await.unwrap();

    assert_eq!(
        store.aggregate().await.unwrap(),
        Statistics {
            known: 2,
            learned: 1,
            unknown: 2,
            starred: 1
        }
    );

    let unknown = store.list_by_status(StudyStatus::Unknown).await.unwrap();
    let ids: Vec<_> = unknown.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["olympic_3", "1_4"]);
    assert_eq!(unknown[0].group, GroupId::Supplementary);

    let map = store.status_map().await.unwrap();
    assert_eq!(map.len(), 6);
    assert_eq!(map.get("starred_1_1"), Some(&StudyStatus::Starred));
}

#[tokio::test]
async fn sqlite_namespaces_do_not_leak() {
    let storage = Storage::sqlite("sqlite:file:memdb_isolation?mode=memory&cache=shared")
        .await
        .expect("storage");
    let alice = storage
        .open(UserKey::new("alice").unwrap(), fixed_clock())
        .await
        .unwrap();
    let bob = storage
        .open(UserKey::new("bob").unwrap(), fixed_clock())
        .await
        .unwrap();

    let w = word("1_1", GroupId::Day(1));
    alice.put_status(&w, Outcome::Known).await.unwrap();
    alice.put_starred(&w).await.unwrap();

    assert_eq!(bob.get_status(&w.id).await.unwrap(), StudyStatus::Unknown);
    assert!(!bob.is_starred(&w.id).await.unwrap());
    assert_eq!(bob.aggregate().await.unwrap(), Statistics::default());

    bob.remove_starred(&w.id).await.unwrap();
    assert!(alice.is_starred(&w.id).await.unwrap());
}

#[tokio::test]
async fn sqlite_user_registry_and_delete_cascade() {
    let repo = connect("memdb_users").await;
    let alice = UserKey::new("alice").unwrap();
    let now = fixed_now();

    repo.upsert_user(&UserRecord::new(alice.clone(), now))
        .await
        .unwrap();
    let later = UserRecord {
        key: alice.clone(),
        created_at: now + Duration::days(3),
        last_login_at: now + Duration::days(3),
    };
    repo.upsert_user(&later).await.unwrap();

    let stored = repo.get_user(&alice).await.unwrap().expect("user");
    assert_eq!(stored.created_at, now);
    assert_eq!(stored.last_login_at, now + Duration::days(3));

    let store = storage::WordStore::open(
        std::sync::Arc::new(repo.clone()),
        alice.clone(),
        Clock::fixed(now),
    )
    .await
    .unwrap();
    store
        .put_status(&word("2_1", GroupId::Day(2)), Outcome::Learned)
        .await
        .unwrap();

    repo.delete_user(&alice).await.unwrap();
    assert!(repo.get_user(&alice).await.unwrap().is_none());
    assert!(repo.all_entries(&alice).await.unwrap().is_empty());
    assert!(repo.list_users().await.unwrap().is_empty());
}
