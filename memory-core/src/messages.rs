use serde::{Deserialize, Serialize};
use thiserror::Error;

const EN: &str = include_str!("../locales/en.json");
const ZH: &str = include_str!("../locales/zh.json");

#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("malformed message catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// User-facing strings, keyed the same way as the bundled JSON catalogs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    pub input_label: String,
    pub start_button: String,
    pub invalid_input: String,
    pub win: String,
    pub wrong_order: String,
}

impl Messages {
    /// Parse an injected catalog.
    pub fn from_json(text: &str) -> Result<Self, MessagesError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Bundled catalog for `lang`; anything not Chinese gets English.
    pub fn for_lang(lang: &str) -> Result<Self, MessagesError> {
        if lang.to_lowercase().starts_with("zh") {
            Self::from_json(ZH)
        } else {
            Self::from_json(EN)
        }
    }
}

impl Messages {
    // Used only if the bundled English catalog fails to parse.
    fn builtin() -> Self {
        Messages {
            input_label: "How many numbers (3-7)?".to_string(),
            start_button: "Go".to_string(),
            invalid_input: "Please enter a whole number from 3 to 7.".to_string(),
            win: "Well done! You clicked every number in order.".to_string(),
            wrong_order: "Wrong order! Here is where the numbers were.".to_string(),
        }
    }
}

impl Default for Messages {
    /// The bundled English catalog.
    fn default() -> Self {
        Self::from_json(EN).unwrap_or_else(|_| Self::builtin())
    }
}
