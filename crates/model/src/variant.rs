use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size-differentiated members of the XYLent family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    #[serde(rename = "xylent-base")]
    Base,
    #[serde(rename = "xylent-large")]
    Large,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Base, Variant::Large];

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Base => "xylent-base",
            Variant::Large => "xylent-large",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name() == s.trim())
            .ok_or_else(|| Error::UnknownVariant(s.to_owned()))
    }
}

/// Where a pretrained resource for a variant can be fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLocator {
    /// No location has been published for this resource yet.
    Pending,
    Remote(&'static str),
}

impl ResourceLocator {
    pub fn url(&self) -> Option<&'static str> {
        match self {
            ResourceLocator::Pending => None,
            ResourceLocator::Remote(url) => Some(url),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ResourceLocator::Pending)
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocator::Pending => f.write_str("<pending>"),
            ResourceLocator::Remote(url) => f.write_str(url),
        }
    }
}
