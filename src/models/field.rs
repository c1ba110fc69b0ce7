use std::fmt;
use std::str::FromStr;

use crate::error::VconError;

/// Top-level keys of a serialized vCon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VconField {
    Uuid,
    CreatedAt,
    UpdatedAt,
    Dialog,
    Parties,
    Attachments,
    Analysis,
}

impl VconField {
    /// All fields in serialization order
    pub const ALL: [VconField; 7] = [
        VconField::Uuid,
        VconField::CreatedAt,
        VconField::UpdatedAt,
        VconField::Dialog,
        VconField::Parties,
        VconField::Attachments,
        VconField::Analysis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VconField::Uuid => "uuid",
            VconField::CreatedAt => "created_at",
            VconField::UpdatedAt => "updated_at",
            VconField::Dialog => "dialog",
            VconField::Parties => "parties",
            VconField::Attachments => "attachments",
            VconField::Analysis => "analysis",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            VconField::Dialog | VconField::Parties | VconField::Attachments | VconField::Analysis
        )
    }
}

impl fmt::Display for VconField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VconField {
    type Err = VconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VconField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| VconError::UnknownField(s.to_string()))
    }
}
