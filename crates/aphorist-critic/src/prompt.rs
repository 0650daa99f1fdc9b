//! Prompt templates, tone modes and languages

use aphorist_domain::ChatRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone of the critique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Balanced and analytical
    #[default]
    Clarity,
    /// Incisive, no softening
    Brutal,
    /// Gentle and emotionally aware
    Compassion,
}

impl ToneMode {
    /// Every mode, in display order
    pub const ALL: [ToneMode; 3] = [ToneMode::Clarity, ToneMode::Brutal, ToneMode::Compassion];

    /// Lowercase mode name
    pub fn name(self) -> &'static str {
        match self {
            ToneMode::Clarity => "clarity",
            ToneMode::Brutal => "brutal",
            ToneMode::Compassion => "compassion",
        }
    }

    /// Parse a mode name, falling back to [`ToneMode::Clarity`]
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Tone instruction in the given language
    ///
    /// Languages without a localized template use English.
    pub fn description(self, language: Language) -> &'static str {
        match (language.template_language(), self) {
            (Language::Spanish, ToneMode::Clarity) => {
                "Precisión equilibrada, tono analítico tranquilo."
            }
            (Language::Spanish, ToneMode::Brutal) => "Crítica incisiva e inquebrantable.",
            (Language::Spanish, ToneMode::Compassion) => {
                "Crítica gentil y emocionalmente consciente."
            }
            (Language::French, ToneMode::Clarity) => "Précision équilibrée, ton analytique calme.",
            (Language::French, ToneMode::Brutal) => "Critique incisive et sans compromis.",
            (Language::French, ToneMode::Compassion) => {
                "Critique douce et émotionnellement consciente."
            }
            (Language::German, ToneMode::Clarity) => {
                "Ausgewogene Präzision, ruhiger analytischer Ton."
            }
            (Language::German, ToneMode::Brutal) => "Scharfsinnige und kompromisslose Kritik.",
            (Language::German, ToneMode::Compassion) => "Sanfte und emotional bewusste Kritik.",
            (_, ToneMode::Clarity) => "Balanced precision, calm analytical tone.",
            (_, ToneMode::Brutal) => "Incisive and uncompromising critique.",
            (_, ToneMode::Compassion) => "Gentle, emotionally aware critique.",
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clarity" => Ok(ToneMode::Clarity),
            "brutal" => Ok(ToneMode::Brutal),
            "compassion" => Ok(ToneMode::Compassion),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}

/// Response language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// English
    #[default]
    #[serde(rename = "en")]
    English,
    /// Spanish
    #[serde(rename = "es")]
    Spanish,
    /// French
    #[serde(rename = "fr")]
    French,
    /// German
    #[serde(rename = "de")]
    German,
    /// Italian
    #[serde(rename = "it")]
    Italian,
    /// Portuguese
    #[serde(rename = "pt")]
    Portuguese,
    /// Japanese
    #[serde(rename = "ja")]
    Japanese,
    /// Chinese
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    /// Every supported language
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Japanese,
        Language::Chinese,
    ];

    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
        }
    }

    /// English name
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
        }
    }

    /// Name in the language itself
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::French => "Français",
            Language::German => "Deutsch",
            Language::Italian => "Italiano",
            Language::Portuguese => "Português",
            Language::Japanese => "日本語",
            Language::Chinese => "中文",
        }
    }

    /// Whether a localized prompt template exists
    pub fn has_template(self) -> bool {
        matches!(
            self,
            Language::English | Language::Spanish | Language::French | Language::German
        )
    }

    fn template_language(self) -> Language {
        if self.has_template() {
            self
        } else {
            Language::English
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts a code (`"fr"`), an English name or a native name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        // Regional variants such as "pt_BR" or "zh-CN" resolve to the base language
        let base = wanted.split(['_', '-']).next().unwrap_or_default();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code() == base
                    || lang.name().to_lowercase() == wanted
                    || lang.native_name().to_lowercase() == wanted
            })
            .ok_or_else(|| format!("Unsupported language: {}", s.trim()))
    }
}

/// Builds the chat request for one critique
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    mode: ToneMode,
    language: Language,
}

impl PromptBuilder {
    /// Create a prompt builder
    pub fn new(mode: ToneMode, language: Language) -> Self {
        Self { mode, language }
    }

    /// System instructions with the tone filled in
    pub fn system_prompt(&self) -> String {
        let template = match self.language.template_language() {
            Language::Spanish => TEMPLATE_ES,
            Language::French => TEMPLATE_FR,
            Language::German => TEMPLATE_DE,
            _ => TEMPLATE_EN,
        };
        template.replace("{tone}", self.mode.description(self.language))
    }

    /// Complete request for `quote`
    pub fn build(&self, quote: &str, max_tokens: u32) -> ChatRequest {
        ChatRequest {
            system: self.system_prompt(),
            user: quote.to_string(),
            max_tokens,
        }
    }
}

const TEMPLATE_EN: &str = r#"You are a philosophy analyst. Return STRICT, VALID JSON with these EXACT fields:
{
    "surface_claim": "one sentence summary of the literal promise",
    "hidden_assumption": "the logical gap or oversimplification",
    "philosophical_grounding": ["Tradition1", "Tradition2"],
    "revised_quote": "more honest, intellectually rigorous version",
    "anchor_quote": {
        "text": "related canonical quote",
        "author": "philosopher name",
        "tradition": "tradition name"
    }
}

Tone: {tone}
Constraints: Keep each field under 80 words. Be intellectually honest. No invented quotes.
IMPORTANT: Return ONLY valid JSON, no markdown or extra text."#;

const TEMPLATE_ES: &str = r#"Eres un analista de filosofía. Devuelve JSON ESTRICTO y VÁLIDO con estos campos EXACTOS:
{
    "surface_claim": "resumen de una frase de la promesa literal",
    "hidden_assumption": "la brecha lógica o simplificación excesiva",
    "philosophical_grounding": ["Tradición1", "Tradición2"],
    "revised_quote": "versión más honesta e intelectualmente rigurosa",
    "anchor_quote": {
        "text": "cita canónica relacionada",
        "author": "nombre del filósofo",
        "tradition": "nombre de la tradición"
    }
}

Tono: {tone}
Restricciones: Mantén cada campo bajo 80 palabras. Sé intelectualmente honesto. Sin citas inventadas.
IMPORTANTE: Devuelve SOLO JSON válido, sin markdown ni texto adicional."#;

const TEMPLATE_FR: &str = r#"Vous êtes un analyste de philosophie. Renvoyez un JSON STRICT et VALIDE avec ces champs EXACTS :
{
    "surface_claim": "résumé en une phrase de la promesse littérale",
    "hidden_assumption": "l'écart logique ou la simplification excessive",
    "philosophical_grounding": ["Tradition1", "Tradition2"],
    "revised_quote": "version plus honnête et intellectuellement rigoureuse",
    "anchor_quote": {
        "text": "citation canonique connexe",
        "author": "nom du philosophe",
        "tradition": "nom de la tradition"
    }
}

Ton : {tone}
Contraintes : Gardez chaque champ sous 80 mots. Soyez intellectuellement honnête. Aucune citation inventée.
IMPORTANT : Renvoyez UNIQUEMENT du JSON valide, sans markdown ni texte supplémentaire."#;

const TEMPLATE_DE: &str = r#"Sie sind ein Philosophieanalyst. Geben Sie striktes, gültiges JSON mit diesen EXAKTEN Feldern zurück:
{
    "surface_claim": "Zusammenfassung des wörtlichen Versprechens in einem Satz",
    "hidden_assumption": "die logische Lücke oder Vereinfachung",
    "philosophical_grounding": ["Tradition1", "Tradition2"],
    "revised_quote": "ehrlichere, intellektuell rigorosere Version",
    "anchor_quote": {
        "text": "verwandtes kanonisches Zitat",
        "author": "Name des Philosophen",
        "tradition": "Name der Tradition"
    }
}

Ton: {tone}
Einschränkungen: Halten Sie jedes Feld unter 80 Wörtern. Seien Sie intellektuell ehrlich. Keine erfundenen Zitate.
WICHTIG: Geben Sie NUR gültiges JSON zurück, ohne Markdown oder zusätzlichen Text."#;
