//! OCR Types
//!
//! Defines request/response types for the remote word OCR service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages supported by the OCR service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hindi,
    English,
    Marathi,
    Tamil,
    Telugu,
    Kannada,
    Gujarati,
    Punjabi,
    Bengali,
    Malayalam,
    Assamese,
    Manipuri,
    Oriya,
    Urdu,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Hindi,
        Language::English,
        Language::Marathi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Gujarati,
        Language::Punjabi,
        Language::Bengali,
        Language::Malayalam,
        Language::Assamese,
        Language::Manipuri,
        Language::Oriya,
        Language::Urdu,
    ];

    /// Code sent to the OCR service
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hindi => "hi",
            Self::English => "en",
            Self::Marathi => "mr",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Kannada => "kn",
            Self::Gujarati => "gu",
            Self::Punjabi => "pa",
            Self::Bengali => "bn",
            Self::Malayalam => "ml",
            Self::Assamese => "asa",
            Self::Manipuri => "mni",
            Self::Oriya => "ori",
            Self::Urdu => "ur",
        }
    }

    /// Human-readable name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hindi => "hindi",
            Self::English => "english",
            Self::Marathi => "marathi",
            Self::Tamil => "tamil",
            Self::Telugu => "telugu",
            Self::Kannada => "kannada",
            Self::Gujarati => "gujarati",
            Self::Punjabi => "punjabi",
            Self::Bengali => "bengali",
            Self::Malayalam => "malayalam",
            Self::Assamese => "assamese",
            Self::Manipuri => "manipuri",
            Self::Oriya => "oriya",
            Self::Urdu => "urdu",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Hindi
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.name() == needle)
            .ok_or_else(|| OcrError::UnsupportedLanguage(s.to_string()))
    }
}

/// Recognition mode passed to the OCR backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Printed,
    Handwritten,
}

impl Default for Modality {
    fn default() -> Self {
        Self::Printed
    }
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Printed => "printed",
            Self::Handwritten => "handwritten",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "printed" => Ok(Self::Printed),
            "handwritten" => Ok(Self::Handwritten),
            other => Err(OcrError::InvalidParameter(format!("unknown modality: {}", other))),
        }
    }
}

/// Wire body for a batch OCR request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest<'a> {
    /// Base64-encoded word images, in region order
    pub image_content: Vec<String>,
    pub modality: Modality,
    pub language: &'a str,
    pub version: &'a str,
}

/// One recognized word in the OCR response
#[derive(Debug, Clone, Deserialize)]
pub struct WordResult {
    pub text: String,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid OCR parameter: {0}")]
    InvalidParameter(String),

    #[error("OCR service request failed: {0}")]
    RequestFailed(String),

    #[error("OCR service returned {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Malformed OCR response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        let expected = [
            ("hindi", "hi"),
            ("english", "en"),
            ("marathi", "mr"),
            ("tamil", "ta"),
            ("telugu", "te"),
            ("kannada", "kn"),
            ("gujarati", "gu"),
            ("punjabi", "pa"),
            ("bengali", "bn"),
            ("malayalam", "ml"),
            ("assamese", "asa"),
            ("manipuri", "mni"),
            ("oriya", "ori"),
            ("urdu", "ur"),
        ];

        assert_eq!(expected.len(), Language::ALL.len());
        for (name, code) in expected {
            let lang: Language = name.parse().unwrap();
            assert_eq!(lang.code(), code);
        }
    }

    #[test]
    fn test_language_name_normalized() {
        assert_eq!(" Hindi ".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!("URDU".parse::<Language>().unwrap(), Language::Urdu);
    }

    #[test]
    fn test_unsupported_language() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedLanguage(ref name) if name == "klingon"));

        // Codes are not names
        assert!("hi".parse::<Language>().is_err());
    }

    #[test]
    fn test_modality_parse() {
        assert_eq!("printed".parse::<Modality>().unwrap(), Modality::Printed);
        assert_eq!("Handwritten".parse::<Modality>().unwrap(), Modality::Handwritten);
        assert!("cursive".parse::<Modality>().is_err());
    }

    #[test]
    fn test_request_wire_format() {
        let request = OcrRequest {
            image_content: vec!["AAAA".to_string()],
            modality: Modality::Printed,
            language: Language::Tamil.code(),
            version: "v4_robust",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "imageContent": ["AAAA"],
                "modality": "printed",
                "language": "ta",
                "version": "v4_robust",
            })
        );
    }
}
