//! `SeaORM` Entity for configuration table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "configuration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub url: String,
    pub username: String,
    pub password: String,
    pub api_key: String,
    pub refresh_interval: Option<i32>,
    pub request_timeout: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub asset_filter: Option<String>,
    pub enable: Option<bool>,
    pub active: Option<bool>,
    #[sea_orm(column_type = "Text", nullable)]
    pub project_ids: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asset::Entity")]
    Asset,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
