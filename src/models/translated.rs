use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A free-text value keyed by locale code (`"en"`, `"ca"`, ...).
///
/// Entries are ordered by locale so the JSON form stored in `entity_properties`
/// is stable across writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatedText(pub BTreeMap<String, String>);

impl TranslatedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, value: &str) {
        self.0.insert(locale.to_string(), value.to_string());
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Value for display: the locale if set, otherwise the first non-empty one.
    pub fn pick(&self, locale: impl AsRef<str>) -> String {
        self.get(locale.as_ref())
            .filter(|v| !v.is_empty())
            .or_else(|| self.0.values().map(String::as_str).find(|v| !v.is_empty()))
            .unwrap_or_default()
            .to_string()
    }

    /// True when the locale has a non-blank value.
    pub fn is_present_in(&self, locale: &str) -> bool {
        self.get(locale).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only the given locales.
    pub fn restricted_to(&self, locales: &[String]) -> Self {
        TranslatedText(
            self.0
                .iter()
                .filter(|(k, _)| locales.iter().any(|l| l == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for TranslatedText {
    fn from(pairs: [(&str, &str); N]) -> Self {
        TranslatedText(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_keeps_every_locale() {
        let text = TranslatedText::from([("en", "Hello"), ("ca", "Hola")]);
        let json = text.to_json().unwrap();
        assert_eq!(json, r#"{"ca":"Hola","en":"Hello"}"#);
        assert_eq!(TranslatedText::from_json(&json), text);
    }

    #[test]
    fn presence_ignores_blank_values() {
        let text = TranslatedText::from([("en", "   "), ("ca", "x")]);
        assert!(!text.is_present_in("en"));
        assert!(text.is_present_in("ca"));
        assert!(!text.is_present_in("es"));
    }

    #[test]
    fn pick_falls_back_to_any_translation() {
        let text = TranslatedText::from([("ca", "Reunió")]);
        assert_eq!(text.pick("en"), "Reunió");
        assert_eq!(TranslatedText::new().pick("en"), "");
    }

    #[test]
    fn restriction_drops_unknown_locales() {
        let text = TranslatedText::from([("en", "a"), ("xx", "b")]);
        let kept = text.restricted_to(&["en".to_string()]);
        assert_eq!(kept, TranslatedText::from([("en", "a")]));
    }
}
