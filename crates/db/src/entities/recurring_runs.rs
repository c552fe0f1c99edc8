//! `SeaORM` Entity for recurring_runs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RunStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Uuid,
    pub run_at: DateTimeWithTimeZone,
    pub status: RunStatus,
    pub transaction_id: Option<Uuid>,
    pub error_message: Option<String>,
    pub snapshot: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recurring_templates::Entity",
        from = "Column::TemplateId",
        to = "super::recurring_templates::Column::Id"
    )]
    RecurringTemplates,
}

impl Related<super::recurring_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
