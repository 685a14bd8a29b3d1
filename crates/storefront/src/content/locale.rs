//! Locale handling for CMS fields.
//!
//! Localized CMS fields are objects keyed by locale code (`{"en": .., "fr": ..}`),
//! but older documents still hold plain strings. Both shapes are resolved here:
//! inside a query with [`localized`], and after the fact with [`localized_text`].

use marquee_core::Locale;
use serde_json::Value;

/// GROQ expression selecting `field` in `locale`, falling back to English and
/// then to the raw field.
///
/// ```
/// use marquee_core::Locale;
/// use marquee_storefront::content::locale::localized;
///
/// assert_eq!(
///     localized("title", Locale::Fr),
///     "coalesce(title.fr, title.en, title)"
/// );
/// ```
#[must_use]
pub fn localized(field: &str, locale: Locale) -> String {
    if locale.is_default() {
        format!("coalesce({field}.en, {field})")
    } else {
        format!("coalesce({field}.{locale}, {field}.en, {field})")
    }
}

/// `"name": <localized field>` projection entry.
#[must_use]
pub fn localized_as(name: &str, field: &str, locale: Locale) -> String {
    format!("\"{name}\": {}", localized(field, locale))
}

/// Resolve a locale object or plain string to text.
///
/// Plain strings pass through. A `localeString`/`localeText` object, or an
/// untyped object, yields `locale`, then `fallback`, then whatever its first
/// key holds (even when empty), in document order. Objects of any other
/// `_type` and non-text values resolve to an empty string.
#[must_use]
pub fn localized_text(value: &Value, locale: Locale, fallback: Locale) -> String {
    let map = match value {
        Value::String(s) => return s.clone(),
        Value::Object(map) => map,
        _ => return String::new(),
    };

    let skip_type = match map.get("_type") {
        Some(Value::String(t)) if t == "localeString" || t == "localeText" => true,
        None | Some(Value::Null) => false,
        Some(Value::String(t)) if t.is_empty() => false,
        Some(_) => return String::new(),
    };

    let non_empty = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    non_empty(locale.code())
        .or_else(|| non_empty(fallback.code()))
        .or_else(|| {
            map.iter()
                .find(|(key, _)| !skip_type || key.as_str() != "_type")
                .and_then(|(_, v)| v.as_str())
        })
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_localized_default_locale() {
        assert_eq!(
            localized("viewText", Locale::En),
            "coalesce(viewText.en, viewText)"
        );
    }

    #[test]
    fn test_localized_as_names_the_field() {
        assert_eq!(
            localized_as("label", "label", Locale::Ja),
            "\"label\": coalesce(label.ja, label.en, label)"
        );
    }

    #[test]
    fn test_plain_string_passes_through() {
        assert_eq!(
            localized_text(&json!("Vinyles"), Locale::Ja, Locale::En),
            "Vinyles"
        );
    }

    #[test]
    fn test_locale_then_fallback() {
        let value = json!({"_type": "localeString", "en": "Records", "fr": "Disques"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "Disques");
        assert_eq!(localized_text(&value, Locale::Sv, Locale::En), "Records");
    }

    #[test]
    fn test_empty_translation_is_skipped() {
        let value = json!({"fr": "", "en": "Records"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "Records");
    }

    #[test]
    fn test_first_available_ignores_type() {
        let value = json!({"_type": "localeString", "ja": "レコード"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "レコード");
    }

    #[test]
    fn test_first_available_is_taken_even_when_empty() {
        let value = json!({"_type": "localeText", "ja": "", "es": "Discos"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "");

        let value = json!({"no": "", "sv": "Skivor"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "");
    }

    #[test]
    fn test_untyped_object_uses_its_first_key() {
        let value = json!({"sv": "Skivor", "ja": "レコード"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "Skivor");
    }

    #[test]
    fn test_other_document_types_are_empty() {
        let value = json!({"_type": "block", "en": "Records", "fr": "Disques"});
        assert_eq!(localized_text(&value, Locale::Fr, Locale::En), "");
        assert_eq!(localized_text(&json!({"_type": "x"}), Locale::En, Locale::En), "");
    }

    #[test]
    fn test_null_and_other_values_are_empty() {
        assert_eq!(localized_text(&Value::Null, Locale::En, Locale::En), "");
        assert_eq!(localized_text(&json!(42), Locale::En, Locale::En), "");
        assert_eq!(localized_text(&json!({}), Locale::En, Locale::En), "");
    }
}
