//! Item listings and their lifecycle.
//!
//! An item is owned by exactly one user for its whole life. Its status moves
//! freely between `available` and `unavailable` until it is `traded`, which
//! is terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum allowed length for an item title.
pub const ITEM_TITLE_MAX: usize = 255;
/// Maximum allowed length for location and address fields.
pub const ITEM_PLACE_MAX: usize = 255;
/// Placeholder stored when no location or address is supplied.
pub const NOT_PROVIDED: &str = "Not provided";

/// Validation errors raised by item constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    PlaceTooLong { field: &'static str, max: usize },
    EmptyMediaReference,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "item id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::PlaceTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::EmptyMediaReference => write!(f, "image reference must not be empty"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Stable item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ItemValidationError::InvalidId)
    }

    /// Wrap an already parsed UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Listing category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    #[default]
    Books,
    CourseMaterials,
    Equipment,
    Technology,
}

/// Error returned when parsing an item category from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseItemCategoryError;

impl ItemCategory {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::CourseMaterials => "course_materials",
            Self::Equipment => "equipment",
            Self::Technology => "technology",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParseItemCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid item category")
    }
}

impl std::error::Error for ParseItemCategoryError {}

impl FromStr for ItemCategory {
    type Err = ParseItemCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "books" => Ok(Self::Books),
            "course_materials" => Ok(Self::CourseMaterials),
            "equipment" => Ok(Self::Equipment),
            "technology" => Ok(Self::Technology),
            _ => Err(ParseItemCategoryError),
        }
    }
}

/// Item lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Unavailable,
    Traded,
}

/// Error returned when parsing an item status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseItemStatusError;

impl ItemStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Traded => "traded",
        }
    }

    /// Whether the item has completed a trade.
    pub const fn is_traded(self) -> bool {
        matches!(self, Self::Traded)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParseItemStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("status must be one of available, unavailable or traded")
    }
}

impl std::error::Error for ParseItemStatusError {}

impl FromStr for ItemStatus {
    type Err = ParseItemStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "traded" => Ok(Self::Traded),
            _ => Err(ParseItemStatusError),
        }
    }
}

/// Non-empty item title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemTitle(String);

impl ItemTitle {
    /// Validate and construct a title. Surrounding whitespace is trimmed.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > ITEM_TITLE_MAX {
            return Err(ItemValidationError::TitleTooLong {
                max: ITEM_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ItemTitle> for String {
    fn from(value: ItemTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemTitle {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque reference to an image held by the media store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaReference(String);

impl MediaReference {
    /// Validate and construct a media reference.
    pub fn new(reference: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = reference.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyMediaReference);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for MediaReference {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MediaReference> for String {
    fn from(value: MediaReference) -> Self {
        value.0
    }
}

impl TryFrom<String> for MediaReference {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn place_or_default(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, ItemValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(NOT_PROVIDED.to_owned());
    }
    if trimmed.chars().count() > ITEM_PLACE_MAX {
        return Err(ItemValidationError::PlaceTooLong {
            field,
            max: ITEM_PLACE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Owner-editable listing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub title: ItemTitle,
    pub description: String,
    pub category: ItemCategory,
    pub location: String,
    pub address: String,
    pub image: Option<MediaReference>,
}

/// Raw listing inputs as received from an inbound adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemDetailsParts<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<ItemCategory>,
    pub location: Option<&'a str>,
    pub address: Option<&'a str>,
    pub image: Option<&'a str>,
}

impl ItemDetails {
    /// Validate raw inputs, filling defaults for omitted optional fields.
    ///
    /// # Examples
    /// ```
    /// use barter_backend::domain::{ItemCategory, ItemDetails, ItemDetailsParts, NOT_PROVIDED};
    ///
    /// let details = ItemDetails::try_from_parts(ItemDetailsParts {
    ///     title: "Calculus textbook",
    ///     ..ItemDetailsParts::default()
    /// })
    /// .unwrap();
    /// assert_eq!(details.category, ItemCategory::Books);
    /// assert_eq!(details.location, NOT_PROVIDED);
    /// ```
    pub fn try_from_parts(parts: ItemDetailsParts<'_>) -> Result<Self, ItemValidationError> {
        let image = match parts.image.map(str::trim) {
            Some(reference) if !reference.is_empty() => Some(MediaReference::new(reference)?),
            _ => None,
        };
        Ok(Self {
            title: ItemTitle::new(parts.title)?,
            description: parts.description.unwrap_or_default().to_owned(),
            category: parts.category.unwrap_or_default(),
            location: place_or_default(parts.location, "location")?,
            address: place_or_default(parts.address, "address")?,
            image,
        })
    }
}

/// Item aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner: UserId,
    pub details: ItemDetails,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

impl Item {
    /// Create a freshly listed item. New items are `available` at revision 1.
    pub fn new(id: ItemId, owner: UserId, details: ItemDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            details,
            status: ItemStatus::Available,
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Whether `user` owns this item.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Return a copy with replaced details and a bumped revision.
    #[must_use]
    pub fn with_details(&self, details: ItemDetails, now: DateTime<Utc>) -> Self {
        Self {
            details,
            updated_at: now,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }

    /// Return a copy with a new status and a bumped revision.
    #[must_use]
    pub fn with_status(&self, status: ItemStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            updated_at: now,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }
}
