//! Offers against listed items and their decision lifecycle.
//!
//! An offer is either item-for-item or item-for-money. The variant carries
//! the field that its type requires, so a money offer without an amount or
//! an item offer without a counter-item cannot be represented.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ItemId, UserId};

/// Largest representable amount in cents (ten digits, two of them fractional).
pub const MONEY_MAX_CENTS: i64 = 9_999_999_999;
const MONEY_MAX_INTEGER_DIGITS: usize = 8;
const MONEY_FRACTION_DIGITS: usize = 2;

/// Stable offer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(Uuid);

/// Error returned when an offer identifier is not a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOfferIdError;

impl fmt::Display for ParseOfferIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("offer id must be a valid UUID")
    }
}

impl std::error::Error for ParseOfferIdError {}

impl OfferId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ParseOfferIdError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ParseOfferIdError)
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

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors raised while parsing a money amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyValidationError {
    Malformed,
    NotPositive,
    TooManyFractionDigits { max: usize },
    TooManyDigits { max: usize },
}

impl fmt::Display for MoneyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "money amount must be a decimal number"),
            Self::NotPositive => write!(f, "money amount must be positive"),
            Self::TooManyFractionDigits { max } => {
                write!(f, "money amount may have at most {max} decimal places")
            }
            Self::TooManyDigits { max } => {
                write!(f, "money amount may have at most {max} digits")
            }
        }
    }
}

impl std::error::Error for MoneyValidationError {}

/// Positive monetary amount with cent precision.
///
/// # Examples
/// ```
/// use barter_backend::domain::MoneyAmount;
///
/// let amount: MoneyAmount = "50".parse().unwrap();
/// assert_eq!(amount.cents(), 5000);
/// assert_eq!(amount.to_string(), "50.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    /// Construct from an integer number of cents.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyValidationError> {
        if cents <= 0 {
            return Err(MoneyValidationError::NotPositive);
        }
        if cents > MONEY_MAX_CENTS {
            return Err(MoneyValidationError::TooManyDigits {
                max: MONEY_MAX_INTEGER_DIGITS + MONEY_FRACTION_DIGITS,
            });
        }
        Ok(Self(cents))
    }

    /// Amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }
}

fn parse_digits(digits: &str) -> Result<i64, MoneyValidationError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyValidationError::Malformed);
    }
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<i64>()
        .map_err(|_| MoneyValidationError::Malformed)
}

impl FromStr for MoneyAmount {
    type Err = MoneyValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(rest) = trimmed.strip_prefix('-') {
            return match rest.parse::<Self>() {
                Ok(_) | Err(MoneyValidationError::NotPositive) => {
                    Err(MoneyValidationError::NotPositive)
                }
                Err(other) => Err(other),
            };
        }

        let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(MoneyValidationError::Malformed);
        }
        if fraction.len() > MONEY_FRACTION_DIGITS {
            return Err(MoneyValidationError::TooManyFractionDigits {
                max: MONEY_FRACTION_DIGITS,
            });
        }
        if integer.trim_start_matches('0').len() > MONEY_MAX_INTEGER_DIGITS {
            return Err(MoneyValidationError::TooManyDigits {
                max: MONEY_MAX_INTEGER_DIGITS + MONEY_FRACTION_DIGITS,
            });
        }

        let whole = parse_digits(integer)?;
        let mut cents = parse_digits(fraction)?;
        if fraction.len() == 1 {
            cents *= 10;
        }
        Self::from_cents(whole * 100 + cents)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0.div_euclid(100), self.0.rem_euclid(100))
    }
}

impl From<MoneyAmount> for String {
    fn from(value: MoneyAmount) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for MoneyAmount {
    type Error = MoneyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Discriminant of [`OfferTerms`] as exchanged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Item,
    Money,
}

/// Error returned when parsing an offer type from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOfferTypeError;

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => f.write_str("item"),
            Self::Money => f.write_str("money"),
        }
    }
}

impl fmt::Display for ParseOfferTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("offer type must be item or money")
    }
}

impl std::error::Error for ParseOfferTypeError {}

impl FromStr for OfferType {
    type Err = ParseOfferTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "item" => Ok(Self::Item),
            "money" => Ok(Self::Money),
            _ => Err(ParseOfferTypeError),
        }
    }
}

/// What the offerer gives in exchange for the desired item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "offerType", rename_all = "snake_case")]
pub enum OfferTerms {
    /// Swap for another listed item.
    Item {
        #[serde(rename = "itemOffered")]
        item_offered: ItemId,
    },
    /// Pay a sum of money.
    Money {
        #[serde(rename = "moneyAmount")]
        amount: MoneyAmount,
    },
}

impl OfferTerms {
    /// Discriminant of these terms.
    pub const fn offer_type(&self) -> OfferType {
        match self {
            Self::Item { .. } => OfferType::Item,
            Self::Money { .. } => OfferType::Money,
        }
    }

    /// Counter-item, when the terms are item-for-item.
    pub const fn item_offered(&self) -> Option<ItemId> {
        match self {
            Self::Item { item_offered } => Some(*item_offered),
            Self::Money { .. } => None,
        }
    }

    /// Amount, when the terms are item-for-money.
    pub const fn money_amount(&self) -> Option<MoneyAmount> {
        match self {
            Self::Item { .. } => None,
            Self::Money { amount } => Some(*amount),
        }
    }
}

/// Offer decision status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

/// Error returned when parsing an offer status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOfferStatusError;

impl OfferStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
        }
    }

    /// Whether a decision has been recorded.
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParseOfferStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid offer status")
    }
}

impl std::error::Error for ParseOfferStatusError {}

impl FromStr for OfferStatus {
    type Err = ParseOfferStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "refused" => Ok(Self::Refused),
            _ => Err(ParseOfferStatusError),
        }
    }
}

/// Decision taken by the desired item's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    Accept,
    Refuse,
}

impl OfferDecision {
    /// Status the offer ends in after this decision.
    pub const fn resulting_status(self) -> OfferStatus {
        match self {
            Self::Accept => OfferStatus::Accepted,
            Self::Refuse => OfferStatus::Refused,
        }
    }
}

impl fmt::Display for OfferDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Refuse => f.write_str("refuse"),
        }
    }
}

/// Offer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub item_desired: ItemId,
    pub terms: OfferTerms,
    pub offerer: UserId,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

impl Offer {
    /// Create a pending offer at revision 1.
    pub fn new(
        id: OfferId,
        item_desired: ItemId,
        terms: OfferTerms,
        offerer: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_desired,
            terms,
            offerer,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Return a copy with new terms and a bumped revision.
    #[must_use]
    pub fn with_terms(&self, terms: OfferTerms, now: DateTime<Utc>) -> Self {
        Self {
            terms,
            updated_at: now,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }

    /// Return a copy with the decision applied and a bumped revision.
    #[must_use]
    pub fn decided(&self, decision: OfferDecision, now: DateTime<Utc>) -> Self {
        Self {
            status: decision.resulting_status(),
            updated_at: now,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }
}
