//! Works and materials catalogs.
//!
//! Both catalogs share one item shape and differ only in their kind, which
//! selects the permission pair guarding them and the URL segment serving
//! them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Permission, TeamId};

/// Maximum length of an item name, in characters.
pub const CATALOG_NAME_MAX: usize = 120;
/// Maximum length of a unit label, in characters.
pub const CATALOG_UNIT_MAX: usize = 16;
/// Maximum length of a description, in characters.
pub const CATALOG_DESCRIPTION_MAX: usize = 2000;

/// Which catalog an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Work,
    Material,
}

impl CatalogKind {
    /// Permission needed to list items.
    pub fn read_permission(self) -> Permission {
        match self {
            Self::Work => Permission::WorksRead,
            Self::Material => Permission::MaterialsRead,
        }
    }

    /// Permission needed to create, edit or delete items.
    pub fn write_permission(self) -> Permission {
        match self {
            Self::Work => Permission::WorksWrite,
            Self::Material => Permission::MaterialsWrite,
        }
    }

    /// Plural path segment (`works`, `materials`).
    pub fn segment(self) -> &'static str {
        match self {
            Self::Work => "works",
            Self::Material => "materials",
        }
    }

    /// Singular label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Material => "material",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CatalogKind {
    type Err = CatalogValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "works" => Ok(Self::Work),
            "materials" => Ok(Self::Material),
            _ => Err(CatalogValidationError::UnknownKind {
                segment: s.to_owned(),
            }),
        }
    }
}

/// Catalog item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct CatalogItemId(Uuid);

impl CatalogItemId {
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a catalog draft is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("unit must not be empty")]
    EmptyUnit,
    #[error("unit must be at most {max} characters")]
    UnitTooLong { max: usize },
    #[error("unit price must not be negative")]
    NegativePrice,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("unknown catalog `{segment}`")]
    UnknownKind { segment: String },
}

impl CatalogValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyUnit | Self::UnitTooLong { .. } => "unit",
            Self::NegativePrice => "unitPriceCents",
            Self::DescriptionTooLong { .. } => "description",
            Self::UnknownKind { .. } => "kind",
        }
    }
}

/// Validated input for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItemDraft {
    name: String,
    unit: String,
    unit_price_cents: i64,
    description: Option<String>,
}

impl CatalogItemDraft {
    /// Validate raw input.
    ///
    /// Name and unit are trimmed; a blank description is treated as absent.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CatalogItemDraft, CatalogValidationError};
    ///
    /// let draft = CatalogItemDraft::try_new(" Screed ", "m2", 1250, None).expect("valid");
    /// assert_eq!(draft.name(), "Screed");
    /// assert_eq!(
    ///     CatalogItemDraft::try_new("Screed", "m2", -1, None),
    ///     Err(CatalogValidationError::NegativePrice)
    /// );
    /// ```
    pub fn try_new(
        name: &str,
        unit: &str,
        unit_price_cents: i64,
        description: Option<&str>,
    ) -> Result<Self, CatalogValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        if name.chars().count() > CATALOG_NAME_MAX {
            return Err(CatalogValidationError::NameTooLong {
                max: CATALOG_NAME_MAX,
            });
        }
        let unit = unit.trim();
        if unit.is_empty() {
            return Err(CatalogValidationError::EmptyUnit);
        }
        if unit.chars().count() > CATALOG_UNIT_MAX {
            return Err(CatalogValidationError::UnitTooLong {
                max: CATALOG_UNIT_MAX,
            });
        }
        if unit_price_cents < 0 {
            return Err(CatalogValidationError::NegativePrice);
        }
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if description.is_some_and(|text| text.chars().count() > CATALOG_DESCRIPTION_MAX) {
            return Err(CatalogValidationError::DescriptionTooLong {
                max: CATALOG_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            unit: unit.to_owned(),
            unit_price_cents,
            description: description.map(str::to_owned),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn unit_price_cents(&self) -> i64 {
        self.unit_price_cents
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A stored work or material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub team_id: TeamId,
    pub kind: CatalogKind,
    pub name: String,
    pub unit: String,
    pub unit_price_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// New item owned by `team_id`.
    pub fn create(
        team_id: TeamId,
        kind: CatalogKind,
        draft: CatalogItemDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CatalogItemId::random(),
            team_id,
            kind,
            name: draft.name,
            unit: draft.unit,
            unit_price_cents: draft.unit_price_cents,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping identity and creation time.
    #[must_use]
    pub fn revise(self, draft: CatalogItemDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name,
            unit: draft.unit,
            unit_price_cents: draft.unit_price_cents,
            description: draft.description,
            updated_at: now,
            ..self
        }
    }

    /// Case-insensitive name comparison used for uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

crate::domain::action::plain_action_data!(CatalogItem);
