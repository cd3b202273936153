use super::*;
use chrono::Utc;
use smartpot_core::ReadingTimestamp;

fn reading(pot_id: PotId, ph: f64) -> Reading {
    Reading {
        pot_id,
        timestamp: ReadingTimestamp::from_datetime(&Utc::now()),
        ph,
        soil: ph * 10.0,
    }
}

async fn crud_users(store: &dyn DocumentStore, chat_id: ChatId, other_chat_id: ChatId, pot_id: PotId) {
    // create
    assert_eq!(PotClaim::Created, store.add_pot(chat_id, pot_id).await.unwrap());
    assert_eq!(
        PotClaim::AlreadyAssociated,
        store.add_pot(chat_id, pot_id).await.unwrap()
    );
    assert_eq!(PotClaim::Added, store.add_pot(chat_id, pot_id + 1).await.unwrap());

    // claimed pots stay with their owner, no account is left behind
    assert_eq!(
        PotClaim::ClaimedBy(chat_id),
        store.add_pot(other_chat_id, pot_id).await.unwrap()
    );
    assert_eq!(None, store.pots_of(other_chat_id).await.unwrap());

    // read
    assert_eq!(Some(chat_id), store.owner_of(pot_id).await.unwrap());
    assert_eq!(None, store.owner_of(pot_id + 2).await.unwrap());
    assert_eq!(
        Some(vec![pot_id, pot_id + 1]),
        store.pots_of(chat_id).await.unwrap()
    );
}

async fn crud_images(store: &dyn DocumentStore, pot_id: PotId) {
    assert_eq!(None, store.image_url(pot_id).await.unwrap());

    store.upsert_image(pot_id, "https://cdn/first").await.unwrap();
    store.upsert_image(pot_id, "https://cdn/second").await.unwrap();

    assert_eq!(
        Some("https://cdn/second".to_owned()),
        store.image_url(pot_id).await.unwrap()
    );
}

async fn crud_readings(store: &dyn DocumentStore, pot_id: PotId) {
    for i in 0..5 {
        store
            .insert_reading(&reading(pot_id, i as f64))
            .await
            .unwrap();
    }

    assert_eq!(5, store.count_readings(pot_id).await.unwrap());
    let latest: Vec<f64> = store
        .latest_readings(pot_id, 3)
        .await
        .unwrap()
        .iter()
        .map(|r| r.ph)
        .collect();
    assert_eq!(vec![4.0, 3.0, 2.0], latest);
    assert!(store
        .latest_readings(pot_id + 1, 3)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_memory_store() {
    let store = MemoryDocumentStore::new();
    crud_users(&store, 1, 2, 10).await;
    crud_images(&store, 10).await;
    crud_readings(&store, 10).await;
    store.check().await.unwrap();
}

#[tokio::test]
async fn test_memory_store_unavailable() {
    let store = MemoryDocumentStore::new();
    store.set_available(false);

    assert!(store.add_pot(1, 1).await.is_err());
    assert!(store.owner_of(1).await.is_err());
    assert!(store.check().await.is_err());

    store.set_available(true);
    assert!(store.add_pot(1, 1).await.is_ok());
}

async fn pg_store() -> PgDocumentStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let conn = establish_db_connection(&database_url).await.unwrap();
    migrate(&conn).await.unwrap();
    PgDocumentStore::new(conn)
}

/// Ids that do not collide with earlier runs against the same database
fn unique_id() -> i64 {
    Utc::now().timestamp_micros() * 10
}

#[tokio::test]
#[ignore = "needs a postgres instance in DATABASE_URL"]
async fn test_pg_store() {
    let store = pg_store().await;
    let id = unique_id();

    crud_users(&store, id, id + 5, id).await;
    crud_images(&store, id).await;
    crud_readings(&store, id).await;
    store.check().await.unwrap();
    store.close().await;
}

#[tokio::test]
#[ignore = "needs a postgres instance in DATABASE_URL"]
async fn test_pg_concurrent_registrations() {
    let store = std::sync::Arc::new(pg_store().await);
    let chat_id = unique_id();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.add_pot(chat_id, chat_id + i).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(8, store.pots_of(chat_id).await.unwrap().unwrap().len());
}
