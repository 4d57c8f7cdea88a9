//! Keyword/pattern classification of inbound text.
//!
//! The [`Classifier`] trait is the seam between the state machine and the
//! rule tables. [`KeywordClassifier`] is the rule-table implementation: an
//! ordered list of rule groups per intent, first match wins.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::foundation::{contains_phrase, normalize_text};
use crate::domain::order::{DeliveryType, PaymentMethod};
use crate::domain::session::Intent;

use super::trigger::{Trigger, TriggerKind};

/// Maps (intent, text) to a trigger.
pub trait Classifier: Send + Sync {
    fn classify(&self, intent: Intent, text: &str) -> Trigger;
}

/// Errors raised while building a rule table.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rule table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One keyword/pattern group. Matching runs on normalized text.
///
/// `payment_method` and `delivery_mode` groups resolve through the method
/// and mode tables of the order domain, so their keywords are optional.
///
/// A `whole_message` group only fires when the entire message is one of its
/// keywords. Intents that collect free text (support tickets, addresses,
/// dates) use it for `end` so "quiero cancelar mi pedido" stays input.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub kind: TriggerKind,
    pub keywords: Vec<String>,
    pub patterns: Vec<Regex>,
    pub whole_message: bool,
}

impl RuleGroup {
    pub fn keywords(kind: TriggerKind, keywords: &[&str]) -> Self {
        Self {
            kind,
            keywords: keywords.iter().map(|k| normalize_text(k)).collect(),
            patterns: Vec::new(),
            whole_message: false,
        }
    }

    /// Restricts keyword hits to messages that are exactly a keyword.
    pub fn whole_message(mut self) -> Self {
        self.whole_message = true;
        self
    }

    fn keyword_hit(&self, normalized: &str) -> bool {
        if self.whole_message {
            self.keywords.iter().any(|k| k == normalized)
        } else {
            self.keywords.iter().any(|k| contains_phrase(normalized, k))
        }
    }

    fn matches(&self, normalized: &str) -> Option<Trigger> {
        match self.kind {
            TriggerKind::PaymentMethod => {
                PaymentMethod::from_token(normalized).map(Trigger::PaymentMethod)
            }
            TriggerKind::DeliveryMode => {
                DeliveryType::from_token(normalized).map(Trigger::DeliveryMode)
            }
            kind => {
                let hit = self.keyword_hit(normalized)
                    || self.patterns.iter().any(|p| p.is_match(normalized));
                hit.then(|| simple_trigger(kind))
            }
        }
    }
}

fn simple_trigger(kind: TriggerKind) -> Trigger {
    match kind {
        TriggerKind::Greeting => Trigger::Greeting,
        TriggerKind::MenuBrowse => Trigger::MenuBrowse,
        TriggerKind::OrderStart => Trigger::OrderStart,
        TriggerKind::SupportRequest => Trigger::SupportRequest,
        TriggerKind::Confirm => Trigger::Confirm,
        TriggerKind::AddMore => Trigger::AddMore,
        TriggerKind::End => Trigger::End,
        TriggerKind::PaymentMethod | TriggerKind::DeliveryMode | TriggerKind::Unrecognized => {
            Trigger::Unrecognized
        }
    }
}

const END_WORDS: &[&str] = &["cancelar", "terminar", "salir", "cancel", "exit", "adios", "chau"];
const GREETING_WORDS: &[&str] = &[
    "hola", "buenas", "buenos dias", "buenas tardes", "buenas noches", "saludos", "hello", "hi",
    "hey",
];
const MENU_WORDS: &[&str] = &[
    "menu", "carta", "catalogo", "productos", "precios", "que tienen", "que venden",
];
const ORDER_WORDS: &[&str] = &[
    "quiero", "quisiera", "deseo", "pedir", "pedido", "ordenar", "comprar", "order", "me da",
];
const SUPPORT_WORDS: &[&str] = &[
    "ayuda", "ayudame", "soporte", "problema", "reclamo", "queja", "asesor", "help", "support",
];
const CONFIRM_WORDS: &[&str] = &[
    "si", "confirmar", "confirmo", "listo", "ok", "dale", "correcto", "eso es todo", "nada mas",
    "yes", "confirm",
];
const ADD_MORE_WORDS: &[&str] = &["agregar", "anadir", "mas", "otro", "otra", "add", "more"];

/// Ordered rule groups per intent.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: HashMap<Intent, Vec<RuleGroup>>,
}

impl KeywordClassifier {
    pub fn new(rules: HashMap<Intent, Vec<RuleGroup>>) -> Self {
        Self { rules }
    }

    /// Built-in Spanish/English table.
    ///
    /// In idle, substantive groups come before greetings so "hola, quiero
    /// pizza" starts an order, and support comes before ordering so
    /// "problema con mi pedido" reaches support.
    pub fn spanish_defaults() -> Self {
        let end = || RuleGroup::keywords(TriggerKind::End, END_WORDS);
        let greeting = || RuleGroup::keywords(TriggerKind::Greeting, GREETING_WORDS);
        let menu = || RuleGroup::keywords(TriggerKind::MenuBrowse, MENU_WORDS);
        let order = || RuleGroup::keywords(TriggerKind::OrderStart, ORDER_WORDS);
        let support = || RuleGroup::keywords(TriggerKind::SupportRequest, SUPPORT_WORDS);

        let mut rules = HashMap::new();
        rules.insert(Intent::Idle, vec![end(), support(), menu(), order(), greeting()]);
        rules.insert(Intent::Menu, vec![end(), support(), menu(), order(), greeting()]);
        rules.insert(
            Intent::Order,
            vec![
                end(),
                RuleGroup::keywords(TriggerKind::Confirm, CONFIRM_WORDS),
                RuleGroup::keywords(TriggerKind::AddMore, ADD_MORE_WORDS),
            ],
        );
        rules.insert(
            Intent::Payment,
            vec![end(), RuleGroup::keywords(TriggerKind::PaymentMethod, &[])],
        );
        rules.insert(
            Intent::Delivery,
            vec![
                end().whole_message(),
                RuleGroup::keywords(TriggerKind::DeliveryMode, &[]),
            ],
        );
        rules.insert(Intent::Support, vec![end().whole_message()]);
        Self { rules }
    }

    /// Builds a table from YAML:
    ///
    /// ```yaml
    /// idle:
    ///   - kind: end
    ///     keywords: [cancelar, salir]
    ///   - kind: greeting
    ///     keywords: [hola]
    ///     patterns: ['^h+o+l+a+$']
    /// payment:
    ///   - kind: payment_method
    /// support:
    ///   - kind: end
    ///     keywords: [cancelar]
    ///     whole_message: true
    /// ```
    ///
    /// Intents missing from the document classify everything as unrecognized.
    pub fn from_yaml(yaml: &str) -> Result<Self, ClassifierError> {
        let raw: HashMap<Intent, Vec<RawRuleGroup>> = serde_yaml::from_str(yaml)?;
        let mut rules = HashMap::new();
        for (intent, groups) in raw {
            let compiled = groups
                .into_iter()
                .map(RawRuleGroup::compile)
                .collect::<Result<Vec<_>, _>>()?;
            rules.insert(intent, compiled);
        }
        Ok(Self { rules })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Rule groups for one intent, in match order.
    pub fn groups(&self, intent: Intent) -> &[RuleGroup] {
        self.rules.get(&intent).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::spanish_defaults()
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, intent: Intent, text: &str) -> Trigger {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Trigger::Unrecognized;
        }
        self.groups(intent)
            .iter()
            .find_map(|group| group.matches(&normalized))
            .unwrap_or(Trigger::Unrecognized)
    }
}

#[derive(Debug, Deserialize)]
struct RawRuleGroup {
    kind: TriggerKind,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    whole_message: bool,
}

impl RawRuleGroup {
    fn compile(self) -> Result<RuleGroup, ClassifierError> {
        let patterns = self
            .patterns
            .into_iter()
            .map(|pattern| {
                Regex::new(&pattern).map_err(|source| ClassifierError::Pattern { pattern, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleGroup {
            kind: self.kind,
            keywords: self.keywords.iter().map(|k| normalize_text(k)).collect(),
            patterns,
            whole_message: self.whole_message,
        })
    }
}
