use chrono::{DateTime, Utc};
use serde::Serialize;
use x509_parser::prelude::X509Name;

/// Subject distinguished-name attributes relevant to validation tiering.
///
/// An explicit optional-field record rather than a dynamically-typed bag:
/// only the attributes the classifier inspects, plus common name and
/// country for display purposes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl SubjectAttributes {
    /// True when no attribute could be extracted at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.common_name.is_none()
            && self.organization.is_none()
            && self.country.is_none()
            && self.jurisdiction_country.is_none()
            && self.business_category.is_none()
            && self.serial_number.is_none()
    }

    /// Extract the relevant attributes from an X.509 distinguished name.
    #[must_use]
    pub fn from_x509_name(name: &X509Name<'_>) -> Self {
        use x509_parser::der_parser::oid;

        let mut attrs = Self::default();

        for rdn in name.iter() {
            for attr in rdn.iter() {
                let value = attr.as_str().ok().map(ToString::to_string);
                let attr_oid = attr.attr_type();

                if attr_oid == &oid!(2.5.4.3) {
                    // CN
                    attrs.common_name = value;
                } else if attr_oid == &oid!(2.5.4.10) {
                    // O
                    attrs.organization = value;
                } else if attr_oid == &oid!(2.5.4.6) {
                    // C
                    attrs.country = value;
                } else if attr_oid == &oid!(2.5.4.15) {
                    // businessCategory
                    attrs.business_category = value;
                } else if attr_oid == &oid!(2.5.4.5) {
                    // serialNumber
                    attrs.serial_number = value;
                } else if attr_oid == &oid!(1.3.6.1.4.1.311.60.2.1.3) {
                    // jurisdictionOfIncorporationCountryName
                    attrs.jurisdiction_country = value;
                }
            }
        }

        attrs
    }
}

/// Certificate metadata extracted from the peer's end-entity certificate
/// after the handshake.
#[derive(Debug, Clone)]
pub struct CertificateMetadata {
    pub subject: SubjectAttributes,
    pub issuer_organization: Option<String>,
    pub issuer_common_name: Option<String>,
    /// End of the certificate's validity period
    pub not_after: DateTime<Utc>,
    /// Whether the chain validated against the webpki trust roots
    pub authorized: bool,
}

impl CertificateMetadata {
    /// Display name for the issuing authority: organization, then common
    /// name, then a generic label.
    #[must_use]
    pub fn issuer_display(&self) -> String {
        self.issuer_organization
            .clone()
            .or_else(|| self.issuer_common_name.clone())
            .unwrap_or_else(|| "Unknown Issuer".to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_subject_attributes_default_is_empty() {
        assert!(SubjectAttributes::default().is_empty());
    }

    #[test]
    fn test_subject_attributes_with_any_field_is_not_empty() {
        let attrs = SubjectAttributes {
            common_name: Some("example.com".to_string()),
            ..SubjectAttributes::default()
        };
        assert!(!attrs.is_empty());

        let attrs = SubjectAttributes {
            jurisdiction_country: Some("US".to_string()),
            ..SubjectAttributes::default()
        };
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_subject_serialization_skips_absent_fields() {
        let attrs = SubjectAttributes {
            organization: Some("Example Inc".to_string()),
            country: Some("US".to_string()),
            ..SubjectAttributes::default()
        };

        let json = serde_json::to_string(&attrs).unwrap();
        assert!(json.contains("\"organization\":\"Example Inc\""));
        assert!(json.contains("\"country\":\"US\""));
        assert!(!json.contains("commonName"));
        assert!(!json.contains("businessCategory"));
    }

    #[test]
    fn test_issuer_display_prefers_organization() {
        let metadata = CertificateMetadata {
            subject: SubjectAttributes::default(),
            issuer_organization: Some("Example CA".to_string()),
            issuer_common_name: Some("Example CA R3".to_string()),
            not_after: Utc::now(),
            authorized: true,
        };
        assert_eq!(metadata.issuer_display(), "Example CA");
    }

    #[test]
    fn test_issuer_display_falls_back_to_common_name() {
        let metadata = CertificateMetadata {
            subject: SubjectAttributes::default(),
            issuer_organization: None,
            issuer_common_name: Some("Example CA R3".to_string()),
            not_after: Utc::now(),
            authorized: false,
        };
        assert_eq!(metadata.issuer_display(), "Example CA R3");
    }

    #[test]
    fn test_issuer_display_generic_label() {
        let metadata = CertificateMetadata {
            subject: SubjectAttributes::default(),
            issuer_organization: None,
            issuer_common_name: None,
            not_after: Utc::now(),
            authorized: false,
        };
        assert_eq!(metadata.issuer_display(), "Unknown Issuer");
    }
}
