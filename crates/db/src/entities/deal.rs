//! Deal entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Category {
    #[sea_orm(string_value = "High-Tech")]
    #[serde(rename = "High-Tech")]
    HighTech,
    #[sea_orm(string_value = "Maison")]
    Maison,
    #[sea_orm(string_value = "Mode")]
    Mode,
    #[sea_orm(string_value = "Loisirs")]
    Loisirs,
    #[sea_orm(string_value = "Autre")]
    Autre,
}

impl Category {
    /// Parse a category from its wire representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "High-Tech" => Some(Self::HighTech),
            "Maison" => Some(Self::Maison),
            "Mode" => Some(Self::Mode),
            "Loisirs" => Some(Self::Loisirs),
            "Autre" => Some(Self::Autre),
            _ => None,
        }
    }

    /// Wire representation of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighTech => "High-Tech",
            Self::Maison => "Maison",
            Self::Mode => "Mode",
            Self::Loisirs => "Loisirs",
            Self::Autre => "Autre",
        }
    }
}

/// Moderation status of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl Status {
    /// Parse a status from its wire representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Deal price, non-negative
    pub price: f64,

    /// Price before discount, non-negative
    #[sea_orm(nullable)]
    pub original_price: Option<f64>,

    /// External link to the offer
    #[sea_orm(nullable)]
    pub url: Option<String>,

    pub category: Category,

    /// Mutated only by the moderation workflow
    pub status: Status,

    /// Cached hot − cold vote balance, recomputed on every vote mutation
    #[sea_orm(default_value = 0)]
    pub temperature: i32,

    /// Owning user, immutable
    #[sea_orm(indexed)]
    pub author_id: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_round_trip() {
        for category in [
            Category::HighTech,
            Category::Maison,
            Category::Mode,
            Category::Loisirs,
            Category::Autre,
        ] {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("Jardin"), None);
        // Wire format uses the hyphenated label, not the variant name
        assert_eq!(Category::parse("HighTech"), None);
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [Status::Pending, Status::Approved, Status::Rejected] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("archived"), None);
    }
}
