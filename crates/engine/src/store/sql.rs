//! sea-orm backed document store.
//!
//! Documents are rows of a single `documents` table, scoped by
//! `(namespace, collection)` and listed by insertion order (`seq`). Field
//! payloads are stored as JSON; the schema lives in the `migration` crate.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, entity::prelude::*, sea_query::Expr,
};
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

mod documents {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "documents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub seq: i64,
        pub id: String,
        pub namespace: String,
        pub collection: String,
        pub fields: Json,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

impl DocumentStore for SqlStore {
    async fn list_all(&self, namespace: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        let models = documents::Entity::find()
            .filter(documents::Column::Namespace.eq(namespace))
            .filter(documents::Column::Collection.eq(collection))
            .order_by_asc(documents::Column::Seq)
            .all(&self.database)
            .await?;

        Ok(models
            .into_iter()
            .map(|model| Document {
                id: model.id,
                fields: model.fields,
            })
            .collect())
    }

    async fn create(
        &self,
        namespace: &str,
        collection: &str,
        fields: Value,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let model = documents::ActiveModel {
            seq: ActiveValue::NotSet,
            id: ActiveValue::Set(id.clone()),
            namespace: ActiveValue::Set(namespace.to_string()),
            collection: ActiveValue::Set(collection.to_string()),
            fields: ActiveValue::Set(fields),
            created_at: ActiveValue::Set(Utc::now()),
        };
        model.insert(&self.database).await?;
        Ok(id)
    }

    async fn update(
        &self,
        namespace: &str,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<(), StoreError> {
        let result = documents::Entity::update_many()
            .col_expr(documents::Column::Fields, Expr::value(fields))
            .filter(documents::Column::Namespace.eq(namespace))
            .filter(documents::Column::Collection.eq(collection))
            .filter(documents::Column::Id.eq(id))
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::Unavailable(format!("no such document: {id}")));
        }
        Ok(())
    }

    async fn delete(&self, namespace: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        // Idempotent: zero affected rows is fine.
        documents::Entity::delete_many()
            .filter(documents::Column::Namespace.eq(namespace))
            .filter(documents::Column::Collection.eq(collection))
            .filter(documents::Column::Id.eq(id))
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
