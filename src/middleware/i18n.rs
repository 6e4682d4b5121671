// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANGUAGE: &str = "en";

// Idioma da requisição, a partir do Accept-Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANGUAGE.to_string())
    }
}

/// "pt-BR,pt;q=0.9" -> "pt"
fn primary_language(header_str: &str) -> Option<String> {
    accept_language::parse(header_str)
        .first()
        .and_then(|tag| tag.split('-').next())
        .filter(|primary| !primary.is_empty())
        .map(|primary| primary.to_lowercase())
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(primary_language)
            .map(Locale)
            .unwrap_or_default();

        Ok(locale)
    }
}
