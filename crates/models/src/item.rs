use sea_orm::{entity::prelude::*, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::entity::BaseEntity;

/// Sample entity: a named record with a free-form description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(id: Option<i64>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id, name: name.into(), description: description.into() }
    }

    /// Active model with every column set; an unset id is left to the database sequence.
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: match self.id {
                Some(id) => Set(id),
                None => NotSet,
            },
            name: Set(self.name),
            description: Set(self.description),
        }
    }
}

impl BaseEntity for Item {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

/// Row of the `item` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Item {
    fn from(m: Model) -> Self {
        Self { id: Some(m.id), name: m.name, description: m.description }
    }
}
