use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub conversation_id: i64,
    pub clarity: f64,
    pub relevance: f64,
    pub accuracy: f64,
    pub completeness: f64,
    pub sentiment: String,
    pub empathy: f64,
    pub fallback_count: f64,
    pub resolution: bool,
    pub escalation: bool,
    pub response_time: f64,
    pub overall_score: f64,
    pub created_at_us: i64,
}

impl ActiveModelBehavior for ActiveModel {}
