//! CMS document command.

use marquee_core::Locale;
use marquee_storefront::content::{self, ContentKind, ContentRequest};

use super::{CliError, print_json, sanity_client};

/// Raw command-line parameters for a document fetch.
#[derive(Debug, Default)]
pub struct Params {
    pub locale: String,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Params {
    fn into_request(self) -> Result<ContentRequest, CliError> {
        let locale = self
            .locale
            .parse::<Locale>()
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        Ok(ContentRequest {
            locale,
            slug: self.slug,
            category: self.category,
            page: self.page,
            limit: self.limit,
        })
    }
}

/// Fetch a document and print it as JSON. Documents have no text summary.
pub async fn fetch(document: &str, params: Params) -> Result<(), CliError> {
    let kind = document
        .parse::<ContentKind>()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let request = params.into_request()?;

    let client = sanity_client()?;
    let value = content::fetch_document(&client, kind, &request).await?;
    print_json(&value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_region_locale_accepted() {
        let request = Params {
            locale: "fr-FR".to_string(),
            page: Some(2),
            ..Params::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.locale, Locale::Fr);
        assert_eq!(request.page, Some(2));
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let err = Params {
            locale: "xx".to_string(),
            ..Params::default()
        }
        .into_request()
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
