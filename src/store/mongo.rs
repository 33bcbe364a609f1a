//! Document store client (MongoDB).

use crate::document::DocumentRecord;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, IndexModel};
use tracing::info;

/// Handle to the `documents` collection.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and ping. A failed ping means the store does not participate.
    pub async fn connect(url: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(db_name);
        database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(Self {
            collection: database.collection("documents"),
        })
    }

    /// Create the lookup indexes. Idempotent.
    pub async fn init(&self) -> Result<(), mongodb::error::Error> {
        self.collection
            .create_index(
                IndexModel::builder().keys(doc! { "filename": 1 }).build(),
                None,
            )
            .await?;
        self.collection
            .create_index(
                IndexModel::builder().keys(doc! { "upload_date": 1 }).build(),
                None,
            )
            .await?;
        info!("MongoDB indexes created");
        Ok(())
    }

    /// Insert a record, returning its ObjectId as a hex string.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<String, mongodb::error::Error> {
        let doc = mongodb::bson::to_document(record)?;
        let result = self.collection.insert_one(doc, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string());
        Ok(id)
    }
}
