//! Document store access.
//!
//! The [`Store`] handle is built once at startup and shared through
//! application state; the underlying client pools connections internally
//! and connects lazily, so construction never blocks on the network.

use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};

#[derive(Clone)]
pub struct Store {
    client: Client,
    db: Database,
}

/// Build the store handle from a connection string.
///
/// The Stable API is pinned to V1 in strict mode so the deployment rejects
/// commands outside the versioned surface.
pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Store> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    let client = Client::with_options(options)?;
    let db = client.database(db_name);

    Ok(Store { client, db })
}

impl Store {
    /// Round trip to the deployment; used by the startup probe only.
    pub async fn ping(&self) -> mongodb::error::Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    fn services(&self) -> Collection<Document> {
        self.db.collection("services")
    }

    fn orders(&self) -> Collection<Document> {
        self.db.collection("orders")
    }
}

// Service catalog operations. Read-only: no mutation route exists for this
// collection.
pub mod services {
    use super::*;
    use futures::TryStreamExt;
    use mongodb::bson::oid::ObjectId;
    use mongodb::error::Result;

    pub async fn list_all(store: &Store) -> Result<Vec<Document>> {
        store.services().find(doc! {}).await?.try_collect().await
    }

    /// Fetch one catalog entry projected to its public fields. The raw `_id`
    /// is always excluded from the projection.
    pub async fn get_summary(store: &Store, id: ObjectId) -> Result<Option<Document>> {
        store
            .services()
            .find_one(doc! { "_id": id })
            .projection(doc! { "_id": 0, "title": 1, "img": 1, "price": 1, "service_id": 1 })
            .await
    }
}

// Order operations. Each route performs exactly one of these calls.
pub mod orders {
    use super::*;
    use futures::TryStreamExt;
    use mongodb::bson::oid::ObjectId;
    use mongodb::error::Result;
    use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};

    pub async fn list(store: &Store, filter: Document) -> Result<Vec<Document>> {
        store.orders().find(filter).await?.try_collect().await
    }

    /// Insert the caller's document verbatim; the store assigns `_id`.
    pub async fn insert(store: &Store, order: Document) -> Result<InsertOneResult> {
        store.orders().insert_one(order).await
    }

    /// Set only the `status` field, leaving every other field untouched.
    pub async fn set_status(store: &Store, id: ObjectId, status: &str) -> Result<UpdateResult> {
        store
            .orders()
            .update_one(doc! { "_id": id }, doc! { "$set": { "status": status } })
            .await
    }

    pub async fn delete(store: &Store, id: ObjectId) -> Result<DeleteResult> {
        store.orders().delete_one(doc! { "_id": id }).await
    }
}
