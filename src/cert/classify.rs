use crate::tls::SubjectAttributes;
use serde::Serialize;
use std::fmt;

/// Certificate validation tier, in increasing order of issuer vetting rigor.
///
/// - `Dv`: only domain control is verified; no organization in the subject
/// - `Ov`: the subject carries a vetted organization name
/// - `Ev`: organization plus at least one EV indicator (jurisdiction
///   country, business category, or subject serial number)
/// - `Unknown`: no subject information was available at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationTier {
    #[serde(rename = "DV")]
    Dv,
    #[serde(rename = "OV")]
    Ov,
    #[serde(rename = "EV")]
    Ev,
    Unknown,
}

impl fmt::Display for ValidationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dv => write!(f, "DV"),
            Self::Ov => write!(f, "OV"),
            Self::Ev => write!(f, "EV"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Classify a certificate subject into a validation tier.
///
/// Total over every input: an absent or empty attribute record yields
/// `Unknown`, and partial records always land on exactly one label.
/// Precedence, first match wins: Unknown, EV, OV, DV.
#[must_use]
pub fn classify(subject: Option<&SubjectAttributes>) -> ValidationTier {
    let Some(subject) = subject.filter(|s| !s.is_empty()) else {
        return ValidationTier::Unknown;
    };

    let has_org = subject.organization.is_some();
    // EV subjects carry jurisdiction or business-category attributes in
    // addition to the organization name
    let has_ev_indicator = subject.jurisdiction_country.is_some()
        || subject.business_category.is_some()
        || subject.serial_number.is_some();

    if has_org && has_ev_indicator {
        ValidationTier::Ev
    } else if has_org {
        ValidationTier::Ov
    } else {
        ValidationTier::Dv
    }
}
