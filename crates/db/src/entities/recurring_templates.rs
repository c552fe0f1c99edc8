//! `SeaORM` Entity for recurring_templates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{RecurringFrequency, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub transaction_type: TransactionType,
    pub frequency: RecurringFrequency,
    pub interval_days: Option<i32>,
    pub next_run_at: Date,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub is_active: bool,
    pub auto_posting: bool,
    pub executions_total: i64,
    pub success_total: i64,
    pub failure_total: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::recurring_template_lines::Entity")]
    RecurringTemplateLines,
    #[sea_orm(has_many = "super::recurring_runs::Entity")]
    RecurringRuns,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::recurring_template_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTemplateLines.def()
    }
}

impl Related<super::recurring_runs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringRuns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
