use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::StoreError;

/// Collection the rest of the system reads commissions from.
pub const COMMISSIONS_COLLECTION: &str = "commissions";

/// A commission credited to a subject, as stored in the `commissions` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub commission_id: String,
    #[serde(rename = "user_openid")]
    pub subject_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "date", with = "bson_time")]
    pub occurred_at: OffsetDateTime,
    pub status: CommissionStatus,
    #[serde(rename = "type")]
    pub kind: CommissionKind,
    pub description: String,
    #[serde(rename = "order_id")]
    pub order_reference: String,
    #[serde(
        rename = "referred_user_openid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub referred_subject_id: Option<String>,
    #[serde(
        rename = "referred_user_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub referred_subject_name: Option<String>,
    #[serde(with = "bson_time")]
    pub created_at: OffsetDateTime,
    #[serde(with = "bson_time")]
    pub updated_at: OffsetDateTime,
}

impl CommissionRecord {
    /// Creates a pending agent commission earned at `occurred_at`.
    ///
    /// Audit timestamps start out equal to `occurred_at`.
    pub fn new(
        commission_id: impl Into<String>,
        subject_id: impl Into<String>,
        amount: Decimal,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: None,
            commission_id: commission_id.into(),
            subject_id: subject_id.into(),
            amount,
            occurred_at,
            status: CommissionStatus::Pending,
            kind: CommissionKind::Agent,
            description: String::new(),
            order_reference: String::new(),
            referred_subject_id: None,
            referred_subject_name: None,
            created_at: occurred_at,
            updated_at: occurred_at,
        }
    }

    pub fn with_status(mut self, status: CommissionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_kind(mut self, kind: CommissionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_order_reference(mut self, order_reference: impl Into<String>) -> Self {
        self.order_reference = order_reference.into();
        self
    }

    /// Marks this as a referral commission for the given referred subject.
    pub fn referred(mut self, subject_id: impl Into<String>, name: Option<String>) -> Self {
        self.kind = CommissionKind::Referral;
        self.referred_subject_id = Some(subject_id.into());
        self.referred_subject_name = name;
        self
    }

    /// Checks the invariants a record must hold before it is written.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.amount < Decimal::ZERO {
            return Err(self.invalid(format!("amount {} is negative", self.amount)));
        }
        if self.referred_subject_id.is_some() && self.kind != CommissionKind::Referral {
            return Err(self.invalid(format!(
                "referred subject set on a {} commission",
                self.kind.as_str()
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> StoreError {
        StoreError::InvalidRecord {
            commission_id: self.commission_id.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

impl CommissionStatus {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Paid => "paid",
            CommissionStatus::Cancelled => "cancelled",
        }
    }
}

/// Commission category. Unknown categories round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommissionKind {
    Agent,
    Referral,
    Other(String),
}

impl CommissionKind {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &str {
        match self {
            CommissionKind::Agent => "agent",
            CommissionKind::Referral => "referral",
            CommissionKind::Other(kind) => kind,
        }
    }
}

impl From<String> for CommissionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "agent" => CommissionKind::Agent,
            "referral" => CommissionKind::Referral,
            _ => CommissionKind::Other(value),
        }
    }
}

impl From<CommissionKind> for String {
    fn from(kind: CommissionKind) -> Self {
        match kind {
            CommissionKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// Stores `OffsetDateTime` as a native BSON datetime (millisecond precision).
mod bson_time {
    use mongodb::bson::DateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = (value.unix_timestamp_nanos() / 1_000_000) as i64;
        DateTime::from_millis(millis).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = DateTime::deserialize(deserializer)?;
        OffsetDateTime::from_unix_timestamp_nanos(value.timestamp_millis() as i128 * 1_000_000)
            .map_err(D::Error::custom)
    }
}
