use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};
use uuid::Uuid;

use super::error::{BlankMemberIdSnafu, ChatStoreError, InvalidMessageIdSnafu, StoreResult};

/// Roster-scoped member identifier. A short human-chosen slug such as
/// `"imandi"`, stable for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    pub fn new(raw: impl Into<String>) -> StoreResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        ensure!(
            !trimmed.is_empty(),
            BlankMemberIdSnafu {
                stage: "parse-member-id",
                raw,
            }
        );
        Ok(Self(trimmed.to_string()))
    }

    // For vetted roster literals; callers guarantee the slug is non-blank.
    pub(crate) fn from_static(raw: &'static str) -> Self {
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl TryFrom<String> for MemberId {
    type Error = ChatStoreError;

    fn try_from(raw: String) -> StoreResult<Self> {
        Self::new(raw)
    }
}

impl From<MemberId> for String {
    fn from(value: MemberId) -> Self {
        value.0
    }
}

impl FromStr for MemberId {
    type Err = ChatStoreError;

    fn from_str(raw: &str) -> StoreResult<Self> {
        Self::new(raw)
    }
}

/// Message identifier. UUIDv7, so freshly minted ids are unique and sort in
/// assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new(raw: Uuid) -> Self {
        Self(raw)
    }

    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(raw: &str) -> StoreResult<Self> {
        let parsed = Uuid::parse_str(raw).context(InvalidMessageIdSnafu {
            stage: "parse-message-id",
            raw: raw.to_string(),
        })?;
        Ok(Self(parsed))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}

impl FromStr for MessageId {
    type Err = ChatStoreError;

    fn from_str(raw: &str) -> StoreResult<Self> {
        Self::parse(raw)
    }
}
