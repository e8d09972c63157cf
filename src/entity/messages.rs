use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub conversation_id: i64,
    /// Insertion order within the conversation.
    pub position: i32,
    pub sender: String,
    pub text: String,
    pub timestamp: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
