/// Answer composition for retrieved services.
///
/// Produces the localized local-template reply, the "not found" message, and the
/// French context block a calling language model can rephrase from.
use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;

use service_rag::model::ServiceRecord;

static ARABIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0600}-\x{06FF}]").expect("valid regex"));
static LATIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum Language {
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::French),
            "ar" => Some(Language::Arabic),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Arabic => "ar",
        }
    }

    /// Arabic if the text reads as Arabic, `default` otherwise.
    pub fn detect(text: &str, default: Language) -> Self {
        if is_in_language(text, Language::Arabic) {
            Language::Arabic
        } else {
            default
        }
    }

    /// Service name in this language.
    pub fn service_name<'a>(&self, service: &'a ServiceRecord) -> &'a str {
        match self {
            Language::French => &service.name_fr,
            Language::Arabic => &service.name_ar,
        }
    }
}

/// Whether `text` appears to be written in `lang`.
///
/// Arabic needs Arabic script with fewer than 30% non-Arabic letters (digits and
/// punctuation are ignored). French only needs Latin letters.
pub fn is_in_language(text: &str, lang: Language) -> bool {
    if text.is_empty() {
        return false;
    }
    match lang {
        Language::Arabic => {
            if !ARABIC_RE.is_match(text) {
                return false;
            }
            let total = text.chars().count() as f64;
            let foreign = text
                .chars()
                .filter(|c| c.is_alphabetic() && !('\u{0600}'..='\u{06FF}').contains(c))
                .count() as f64;
            foreign < total * 0.3
        }
        Language::French => LATIN_RE.is_match(text),
    }
}

/// Collapse whitespace runs into single spaces and trim.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

pub fn not_found_message(lang: Language) -> &'static str {
    match lang {
        Language::French => {
            "⚠️ Je n'ai pas trouvé d'informations sur cette question.\n\nVeuillez reformuler."
        }
        Language::Arabic => "⚠️ لم أجد معلومات عن هذا السؤال.\n\nيرجى إعادة صياغة سؤالك.",
    }
}

/// Template reply built from the record alone.
pub fn local_reply(service: &ServiceRecord, lang: Language) -> String {
    let (documents, cost, duration) = match lang {
        Language::French => ("Documents requis:", "Coût:", "Durée:"),
        Language::Arabic => ("الوثائق المطلوبة:", "التكلفة:", "المدة:"),
    };

    let mut reply = format!(
        "**{}**\n\n{}\n\n",
        lang.service_name(service),
        service.description
    );
    if let Some(docs) = &service.documents_required {
        let _ = writeln!(reply, "📋 **{documents}**");
        for doc in docs {
            let _ = writeln!(reply, "• {doc}");
        }
    }
    if let Some(value) = &service.cost {
        let _ = write!(reply, "\n💰 **{cost}** {value}");
    }
    if let Some(value) = &service.duration {
        let _ = write!(reply, "\n⏱️ **{duration}** {value}");
    }
    reply
}

/// Local reply followed by the source line.
pub fn compose_answer(service: &ServiceRecord, lang: Language) -> String {
    format!(
        "{}\n\n📚 Source: {}",
        local_reply(service, lang),
        lang.service_name(service)
    )
}

/// Everything known about a service, as plain text for a language model to answer from.
pub fn build_context(service: &ServiceRecord) -> String {
    let mut context = format!(
        "Service: {} / {}\n\nDescription: {}\n\n",
        service.name_fr, service.name_ar, service.description
    );

    if let Some(docs) = &service.documents_required {
        context.push_str("Documents requis:\n");
        for doc in docs {
            let _ = writeln!(context, "- {doc}");
        }
        context.push('\n');
    }
    if let Some(steps) = &service.steps {
        context.push_str("Étapes:\n");
        for (i, step) in steps.iter().enumerate() {
            let _ = writeln!(context, "{}. {step}", i + 1);
        }
        context.push('\n');
    }
    if let Some(methods) = &service.payment_methods {
        context.push_str("Méthodes de paiement:\n");
        for method in methods {
            let _ = writeln!(context, "{method}");
        }
        context.push('\n');
    }
    if let Some(cost) = &service.cost {
        let _ = writeln!(context, "Coût: {cost}");
    }
    if let Some(duration) = &service.duration {
        let _ = writeln!(context, "Durée: {duration}");
    }
    if let Some(office) = &service.office {
        let _ = writeln!(context, "Bureau: {office}");
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passport() -> ServiceRecord {
        ServiceRecord {
            id: "passport".to_string(),
            name_fr: "Passeport".to_string(),
            name_ar: "جواز السفر".to_string(),
            description: "Délivrance du passeport.".to_string(),
            documents_required: Some(vec!["CNI".to_string(), "Photo".to_string()]),
            steps: Some(vec!["Payer".to_string(), "Se présenter".to_string()]),
            payment_methods: Some(vec!["Bankily".to_string()]),
            cost: Some("3 000 MRU".to_string()),
            duration: Some("2 semaines".to_string()),
            office: Some("ANRPTS".to_string()),
            keywords: vec!["passeport".to_string()],
        }
    }

    #[test]
    fn test_local_reply_french() {
        let reply = local_reply(&passport(), Language::French);
        assert_eq!(
            reply,
            "**Passeport**\n\nDélivrance du passeport.\n\n\
             📋 **Documents requis:**\n• CNI\n• Photo\n\
             \n💰 **Coût:** 3 000 MRU\n⏱️ **Durée:** 2 semaines"
        );
    }

    #[test]
    fn test_local_reply_arabic_uses_arabic_name_and_headings() {
        let reply = local_reply(&passport(), Language::Arabic);
        assert!(reply.starts_with("**جواز السفر**\n\n"));
        assert!(reply.contains("📋 **الوثائق المطلوبة:**\n• CNI\n"));
        assert!(reply.contains("💰 **التكلفة:** 3 000 MRU"));
        assert!(reply.contains("⏱️ **المدة:** 2 semaines"));
    }

    #[test]
    fn test_local_reply_skips_missing_fields() {
        let mut service = passport();
        service.documents_required = None;
        service.cost = None;
        service.duration = None;
        let reply = local_reply(&service, Language::French);
        assert_eq!(reply, "**Passeport**\n\nDélivrance du passeport.\n\n");
    }

    #[test]
    fn test_compose_answer_appends_source() {
        let answer = compose_answer(&passport(), Language::Arabic);
        assert!(answer.ends_with("\n\n📚 Source: جواز السفر"));
    }

    #[test]
    fn test_build_context_lists_every_section() {
        let context = build_context(&passport());
        assert!(context.starts_with("Service: Passeport / جواز السفر\n\nDescription: Délivrance du passeport.\n\n"));
        assert!(context.contains("Documents requis:\n- CNI\n- Photo\n\n"));
        assert!(context.contains("Étapes:\n1. Payer\n2. Se présenter\n\n"));
        assert!(context.contains("Méthodes de paiement:\nBankily\n\n"));
        assert!(context.ends_with("Coût: 3 000 MRU\nDurée: 2 semaines\nBureau: ANRPTS\n"));
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(
            Language::detect("كيف أحصل على جواز السفر؟", Language::French),
            Language::Arabic
        );
        assert_eq!(
            Language::detect("Comment obtenir un passeport ?", Language::French),
            Language::French
        );
        assert_eq!(Language::detect("123", Language::Arabic), Language::Arabic);
        // Mostly Latin text with a single Arabic word is not Arabic.
        assert_eq!(
            Language::detect("je veux un passeport جواز", Language::French),
            Language::French
        );
    }

    #[test]
    fn test_is_in_language() {
        assert!(is_in_language("Bonjour", Language::French));
        assert!(!is_in_language("مرحبا", Language::French));
        assert!(is_in_language("مرحبا", Language::Arabic));
        assert!(!is_in_language("", Language::Arabic));
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code(" AR "), Some(Language::Arabic));
        assert_eq!(Language::from_code("fr"), Some(Language::French));
        assert_eq!(Language::from_code("en"), None);
        assert_eq!(Language::Arabic.code(), "ar");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  passeport \n\n\n  perdu\t!  "), "passeport perdu !");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_not_found_messages() {
        assert!(not_found_message(Language::French).contains("Veuillez reformuler"));
        assert!(not_found_message(Language::Arabic).contains("يرجى إعادة صياغة سؤالك"));
    }
}
