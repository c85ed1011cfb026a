//! SQL-based persistence backend (MySQL/PostgreSQL via SeaORM)
//!
//! Filter expressions and project id lists are stored as JSON text columns.

use async_trait::async_trait;
use sea_orm::{
    prelude::Expr,
    sea_query::{Index, OnConflict},
    *,
};
use tracing::{info, warn};

use crate::entity::{asset, configuration};
use crate::model::*;
use crate::traits::*;

/// External database persistence service
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the tables and the unique identity index when missing
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let configuration_table = schema
            .create_table_from_entity(configuration::Entity)
            .if_not_exists()
            .to_owned();
        self.db.execute(backend.build(&configuration_table)).await?;

        let asset_table = schema
            .create_table_from_entity(asset::Entity)
            .if_not_exists()
            .to_owned();
        self.db.execute(backend.build(&asset_table)).await?;

        let identity_index = Index::create()
            .if_not_exists()
            .name("uk_asset_identity")
            .table(asset::Entity)
            .col(asset::Column::ConfigurationId)
            .col(asset::Column::ProjectId)
            .col(asset::Column::GlobalAssetId)
            .unique()
            .to_owned();
        self.db.execute(backend.build(&identity_index)).await?;

        info!("Database schema initialized ({:?})", backend);
        Ok(())
    }
}

fn to_json_text<T: serde::Serialize>(value: &T) -> anyhow::Result<Option<String>> {
    Ok(Some(serde_json::to_string(value)?))
}

fn from_json_text<T: serde::de::DeserializeOwned>(value: Option<&str>) -> anyhow::Result<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => Ok(Some(serde_json::from_str(text)?)),
        None => Ok(None),
    }
}

/// Convert a stored row into a validated configuration
fn model_to_configuration(model: configuration::Model) -> anyhow::Result<Configuration> {
    let draft = ConfigurationDraft {
        id: Some(model.id),
        asset_filter: from_json_text(model.asset_filter.as_deref())?,
        project_ids: from_json_text(model.project_ids.as_deref())?,
        url: Some(model.url),
        username: Some(model.username),
        password: Some(model.password),
        api_key: Some(model.api_key),
        enable: model.enable,
        refresh_interval: model.refresh_interval.map(i64::from),
        request_timeout: model.request_timeout.map(i64::from),
        active: model.active,
    };
    Ok(draft.validate(model.id)?)
}

fn seconds_column(value: u32) -> anyhow::Result<Option<i32>> {
    Ok(Some(i32::try_from(value)?))
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::ExternalDb
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        configuration::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// ConfigurationPersistence implementation
// ============================================================================

#[async_trait]
impl ConfigurationPersistence for ExternalDbPersistService {
    async fn configuration_find_all(&self) -> anyhow::Result<Vec<Configuration>> {
        let models = configuration::Entity::find()
            .order_by_asc(configuration::Column::Id)
            .all(&self.db)
            .await?;

        let mut configurations = Vec::with_capacity(models.len());
        for model in models {
            let id = model.id;
            match model_to_configuration(model) {
                Ok(configuration) => configurations.push(configuration),
                Err(e) => warn!(configuration_id = id, "Skipping invalid configuration: {}", e),
            }
        }
        Ok(configurations)
    }

    async fn configuration_get(&self, id: i64) -> anyhow::Result<Option<Configuration>> {
        configuration::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_configuration)
            .transpose()
    }

    async fn configuration_create(
        &self,
        configuration: &Configuration,
    ) -> anyhow::Result<Configuration> {
        let entity = configuration::ActiveModel {
            id: NotSet,
            url: Set(configuration.url.clone()),
            username: Set(configuration.username.clone()),
            password: Set(configuration.password.clone()),
            api_key: Set(configuration.api_key.clone()),
            refresh_interval: Set(seconds_column(configuration.refresh_interval)?),
            request_timeout: Set(seconds_column(configuration.request_timeout)?),
            asset_filter: Set(to_json_text(&configuration.asset_filter)?),
            enable: Set(Some(configuration.enable)),
            active: Set(Some(configuration.active)),
            project_ids: Set(to_json_text(&configuration.project_ids)?),
        };

        let model = entity.insert(&self.db).await?;
        model_to_configuration(model)
    }

    async fn configuration_update(&self, configuration: &Configuration) -> anyhow::Result<bool> {
        let Some(model) = configuration::Entity::find_by_id(configuration.id)
            .one(&self.db)
            .await?
        else {
            return Ok(false);
        };

        let mut entity: configuration::ActiveModel = model.into();
        entity.url = Set(configuration.url.clone());
        entity.username = Set(configuration.username.clone());
        entity.password = Set(configuration.password.clone());
        entity.api_key = Set(configuration.api_key.clone());
        entity.refresh_interval = Set(seconds_column(configuration.refresh_interval)?);
        entity.request_timeout = Set(seconds_column(configuration.request_timeout)?);
        entity.asset_filter = Set(to_json_text(&configuration.asset_filter)?);
        entity.enable = Set(Some(configuration.enable));
        entity.project_ids = Set(to_json_text(&configuration.project_ids)?);
        entity.update(&self.db).await?;

        Ok(true)
    }

    async fn configuration_delete(&self, id: i64) -> anyhow::Result<bool> {
        let tx = self.db.begin().await?;

        asset::Entity::delete_many()
            .filter(asset::Column::ConfigurationId.eq(id))
            .exec(&tx)
            .await?;
        let result = configuration::Entity::delete_by_id(id).exec(&tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn configuration_set_active(&self, id: i64, active: bool) -> anyhow::Result<bool> {
        let result = configuration::Entity::update_many()
            .col_expr(configuration::Column::Active, Expr::value(active))
            .filter(configuration::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// AssetPersistence implementation
// ============================================================================

#[async_trait]
impl AssetPersistence for ExternalDbPersistService {
    async fn asset_get_id(
        &self,
        configuration_id: i64,
        project_id: &str,
        global_asset_id: &str,
    ) -> anyhow::Result<Option<i32>> {
        let model = asset::Entity::find()
            .filter(asset::Column::ConfigurationId.eq(configuration_id))
            .filter(asset::Column::ProjectId.eq(project_id))
            .filter(asset::Column::GlobalAssetId.eq(global_asset_id))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.asset_id))
    }

    async fn asset_insert(&self, mapping: &AssetMapping) -> anyhow::Result<()> {
        let entity = asset::ActiveModel {
            id: NotSet,
            configuration_id: Set(mapping.configuration_id),
            project_id: Set(mapping.project_id.clone()),
            global_asset_id: Set(mapping.global_asset_id.clone()),
            asset_id: Set(mapping.asset_id),
        };

        let result = asset::Entity::insert(entity)
            .on_conflict(
                OnConflict::columns([
                    asset::Column::ConfigurationId,
                    asset::Column::ProjectId,
                    asset::Column::GlobalAssetId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn asset_count(&self, configuration_id: i64) -> anyhow::Result<u64> {
        let count = asset::Entity::find()
            .filter(asset::Column::ConfigurationId.eq(configuration_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
