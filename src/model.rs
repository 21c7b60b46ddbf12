//! Response and request models, one module per service.
//!
//! Models are plain data: public fields, `Default`, and serde derives.
//! Unknown response fields are ignored so newer service versions keep
//! deserializing.

#[cfg(any(feature = "alchemy-language", feature = "alchemy-vision"))]
pub mod alchemy;
#[cfg(feature = "natural-language-classifier")]
pub mod classifier;
#[cfg(feature = "language-translation")]
pub mod translation;
#[cfg(feature = "visual-recognition")]
pub mod visual_recognition;

/// Deserializer for numbers the service may send as JSON strings
/// (`"score": "0.87"`). Empty strings and `null` become `None`.
#[cfg(any(feature = "alchemy-language", feature = "alchemy-vision"))]
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
    {
        match Option::<NumberOrString<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", s))),
        }
    }

    #[cfg(test)]
    mod tests {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct Scored {
            #[serde(default, deserialize_with = "super::deserialize")]
            score: Option<f64>,
            #[serde(default, deserialize_with = "super::deserialize")]
            count: Option<u32>,
        }

        #[test]
        fn accepts_numbers_and_numeric_strings() {
            let s: Scored = serde_json::from_str(r#"{"score":"0.87","count":3}"#).unwrap();
            assert_eq!(s.score, Some(0.87));
            assert_eq!(s.count, Some(3));

            let s: Scored = serde_json::from_str(r#"{"score":0.5,"count":"12"}"#).unwrap();
            assert_eq!(s.score, Some(0.5));
            assert_eq!(s.count, Some(12));
        }

        #[test]
        fn missing_empty_and_null_are_none() {
            let s: Scored = serde_json::from_str(r#"{"score":"","count":null}"#).unwrap();
            assert_eq!(s.score, None);
            assert_eq!(s.count, None);
            let s: Scored = serde_json::from_str("{}").unwrap();
            assert_eq!(s.score, None);
        }

        #[test]
        fn rejects_non_numeric_strings() {
            assert!(serde_json::from_str::<Scored>(r#"{"score":"high"}"#).is_err());
        }
    }
}
