use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account's profile row (`profiles` table).
///
/// Linking is symmetric and exclusive: if A links to B then B links to A,
/// and neither holds a third link at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(rename = "partner_id", default)]
    pub linked_partner_id: Option<Uuid>,

    #[serde(default)]
    pub monthly_income: Option<f64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: Some(username.into()),
            linked_partner_id: None,
            monthly_income: None,
            created_at: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked_partner_id.is_some()
    }
}

/// The two account ids a payer split is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub me: Uuid,
    pub partner: Option<Uuid>,
}

impl Household {
    pub fn new(me: Uuid, partner: Option<Uuid>) -> Self {
        Self { me, partner }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.id, profile.linked_partner_id)
    }

    /// Which side of the household an account id belongs to.
    pub fn bucket_of(&self, account: Uuid) -> PayerBucket {
        if account == self.me {
            PayerBucket::Me
        } else if self.partner == Some(account) {
            PayerBucket::Partner
        } else {
            PayerBucket::Unknown
        }
    }
}

/// Result of matching an owning account against the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayerBucket {
    Me,
    Partner,
    Unknown,
}

impl std::fmt::Display for PayerBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayerBucket::Me => write!(f, "Me"),
            PayerBucket::Partner => write!(f, "Partner"),
            PayerBucket::Unknown => write!(f, "Unknown"),
        }
    }
}
