use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "word")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub text: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::definitions::Entity")]
    Definitions,
    #[sea_orm(has_many = "super::saved_words::Entity")]
    SavedWords,
}

impl Related<super::definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Definitions.def()
    }
}

impl Related<super::saved_words::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedWords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
