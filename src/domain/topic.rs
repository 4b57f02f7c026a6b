use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// 16-byte topic identifier as carried on the wire and in the metadata log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TopicId(Uuid);

impl TopicId {
    pub fn new(id: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(id))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// The all-zero id used in responses for unknown topics.
    pub fn zero() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TopicId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<[u8; 16]> for TopicId {
    fn from(id: [u8; 16]) -> Self {
        Self::new(id)
    }
}

impl From<Uuid> for TopicId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl AsRef<[u8]> for TopicId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
