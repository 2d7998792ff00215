use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity record created by the auth adapter on first sign-in.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    /// Avatar URL supplied by the identity provider.
    pub image: Option<String>,

    #[sea_orm(has_many)]
    pub projects: HasMany<super::project::Entity>,

    #[sea_orm(has_many)]
    pub stash_items: HasMany<super::stash_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
