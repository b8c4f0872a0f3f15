use async_trait::async_trait;
use configs::DatabaseConfig;
use models::item::{self, Item};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder};
use tracing::debug;

use crate::errors::ServiceError;
use crate::generic::repository::GenericRepository;

/// SeaORM-backed datastore for [`Item`], stored in the `item` table.
pub struct SeaOrmItemRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a pooled connection from the `[database]` config section.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ServiceError> {
        let db = models::db::connect_with_config(cfg).await?;
        Ok(Self { db })
    }

    /// Move `item_id_seq` past every stored id, so rows inserted with an
    /// explicit id are never handed out again by the sequence.
    async fn sync_id_sequence(&self) -> Result<(), ServiceError> {
        self.db
            .execute_unprepared(SYNC_ID_SEQUENCE)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

const SYNC_ID_SEQUENCE: &str =
    "SELECT setval(pg_get_serial_sequence('item', 'id'), GREATEST((SELECT MAX(id) FROM item), 1))";

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[async_trait]
impl GenericRepository<Item> for SeaOrmItemRepository {
    async fn save(&self, entity: Item) -> Result<Item, ServiceError> {
        let saved = match entity.id {
            None => entity.into_active_model().insert(&self.db).await.map_err(db_err)?,
            Some(id) => {
                let exists = item::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?.is_some();
                debug!(id, exists, "upsert item");
                let am = entity.into_active_model();
                if exists {
                    am.update(&self.db).await.map_err(db_err)?
                } else {
                    let row = am.insert(&self.db).await.map_err(db_err)?;
                    self.sync_id_sequence().await?;
                    row
                }
            }
        };
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: &i64) -> Result<Option<Item>, ServiceError> {
        let found = item::Entity::find_by_id(*id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Item::from))
    }

    async fn find_all(&self) -> Result<Vec<Item>, ServiceError> {
        let rows = item::Entity::find()
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn delete_by_id(&self, id: &i64) -> Result<(), ServiceError> {
        let res = item::Entity::delete_by_id(*id).exec(&self.db).await.map_err(db_err)?;
        debug!(id, rows_affected = res.rows_affected, "delete item");
        Ok(())
    }

    async fn delete(&self, entity: &Item) -> Result<(), ServiceError> {
        match entity.id {
            Some(id) => self.delete_by_id(&id).await,
            None => Ok(()),
        }
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        item::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
