use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Identifier of a ticket card (e.g., T7, HLA12)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts a ticket id from a card element's DOM id.
    ///
    /// Returns `None` when the DOM id does not carry the card prefix or
    /// nothing follows the prefix.
    pub fn from_dom_id(dom_id: &str, prefix: &str) -> Option<Self> {
        match dom_id.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => Some(Self(rest.to_string())),
            _ => None,
        }
    }

    /// Builds the DOM id under which this ticket's card is rendered
    pub fn dom_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl FromStr for TicketId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a board column (e.g., backlog, done)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ColumnId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
