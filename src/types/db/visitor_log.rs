use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum VisitorLogEvent {
    #[sea_orm(string_value = "check_in")]
    CheckIn,
    #[sea_orm(string_value = "check_out")]
    CheckOut,
}

impl VisitorLogEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorLogEvent::CheckIn => "check_in",
            VisitorLogEvent::CheckOut => "check_out",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "visitor_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub visitor_id: String,
    pub access_point_id: Option<String>,
    pub event: VisitorLogEvent,
    pub recorded_by: Option<String>,
    pub recorded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
