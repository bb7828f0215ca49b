//! Wire types shared between handlers and the store layer.

use mongodb::bson::{Bson, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};

/// Acknowledgment for `POST /orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Bson,
}

impl From<InsertOneResult> for InsertAck {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: wire_id(result.inserted_id),
        }
    }
}

/// Acknowledgment for `PATCH /orders/:id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

/// Acknowledgment for `DELETE /orders/:id`. A zero count is still a success;
/// deleting an already-deleted order is not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

/// Identifier wire form: ObjectIds serialize as plain hex strings, never as
/// extended-JSON `$oid` objects. Caller-assigned identifiers pass through.
pub fn wire_id(id: Bson) -> Bson {
    match id {
        Bson::ObjectId(id) => Bson::String(id.to_hex()),
        other => other,
    }
}

/// Rewrite a document's `_id` into its wire form before serialization.
pub fn wire_document(mut doc: Document) -> Document {
    let id = doc.get("_id").and_then(Bson::as_object_id);
    if let Some(id) = id {
        doc.insert("_id", id.to_hex());
    }
    doc
}

/// Body of `PATCH /orders/:id`; only the status field is writable.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Query parameters of `GET /orders`.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: Option<String>,
}
