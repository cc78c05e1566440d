// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens por (idioma, código de erro). Pequeno o bastante
// para viver em memória; cai para inglês quando o idioma ou o código não
// existem.
#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<(&'static str, &'static str), &'static str>,
}

const FALLBACK_LANG: &str = "en";

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();

        // --- Inglês (fallback) ---
        messages.insert(("en", "validation"), "One or more fields are invalid.");
        messages.insert(("en", "invalid_credentials"), "Invalid e-mail or password.");
        messages.insert(("en", "unauthenticated"), "Missing or invalid authentication token.");
        messages.insert(("en", "onboarding_incomplete"), "Finish your company onboarding to access this resource.");
        messages.insert(("en", "forbidden"), "You do not have permission to perform this action.");
        messages.insert(("en", "not_found"), "Resource not found.");
        messages.insert(("en", "conflict"), "The record conflicts with an existing one.");
        messages.insert(("en", "internal"), "An unexpected error occurred.");

        // --- Português ---
        messages.insert(("pt", "validation"), "Um ou mais campos são inválidos.");
        messages.insert(("pt", "invalid_credentials"), "E-mail ou senha inválidos.");
        messages.insert(("pt", "unauthenticated"), "Token de autenticação ausente ou inválido.");
        messages.insert(("pt", "onboarding_incomplete"), "Conclua o cadastro da sua empresa para acessar este recurso.");
        messages.insert(("pt", "forbidden"), "Você não tem permissão para realizar esta ação.");
        messages.insert(("pt", "not_found"), "Recurso não encontrado.");
        messages.insert(("pt", "conflict"), "O registro conflita com um já existente.");
        messages.insert(("pt", "internal"), "Ocorreu um erro inesperado.");

        Self { messages }
    }

    pub fn message(&self, lang: &str, code: &str) -> String {
        self.messages
            .get(&(lang, code))
            .or_else(|| self.messages.get(&(FALLBACK_LANG, code)))
            .copied()
            .unwrap_or("An unexpected error occurred.")
            .to_string()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_locale_and_code() {
        let store = I18nStore::new();
        assert_eq!(store.message("pt", "not_found"), "Recurso não encontrado.");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(store.message("de", "not_found"), "Resource not found.");
    }

    #[test]
    fn unknown_code_yields_generic_message() {
        let store = I18nStore::new();
        assert_eq!(store.message("pt", "nope"), "An unexpected error occurred.");
    }
}
