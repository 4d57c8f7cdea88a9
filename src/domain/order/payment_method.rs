//! Payment methods offered in the chat.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::contains_phrase;

/// A payment method the user can pick by number or by name.
///
/// Only the selection and the textual instructions are handled here;
/// settlement happens outside the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Yape,
    Plin,
    MercadoPago,
    BankTransfer,
}

impl PaymentMethod {
    /// All methods in menu order (1-based numbering).
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Yape,
        PaymentMethod::Plin,
        PaymentMethod::MercadoPago,
        PaymentMethod::BankTransfer,
    ];

    /// Menu number shown to the user.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|m| m == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    /// Label used in replies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Card => "Tarjeta",
            Self::Yape => "Yape",
            Self::Plin => "Plin",
            Self::MercadoPago => "Mercado Pago",
            Self::BankTransfer => "Transferencia bancaria",
        }
    }

    /// Stable snake_case code, matching the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Yape => "yape",
            Self::Plin => "plin",
            Self::MercadoPago => "mercado_pago",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Words accepted for this method, already normalized to lowercase.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Cash => &["efectivo", "cash", "contado"],
            Self::Card => &["tarjeta", "card", "credito", "debito", "visa", "mastercard"],
            Self::Yape => &["yape"],
            Self::Plin => &["plin"],
            Self::MercadoPago => &["mercado pago", "mercadopago", "mercado_pago"],
            Self::BankTransfer => &["transferencia", "bank transfer", "deposito", "bank_transfer"],
        }
    }

    /// Maps a normalized token (`"3"`, `"yape"`, `"pago con tarjeta"`) to a method.
    ///
    /// A bare number selects by menu position; otherwise the first method
    /// whose synonym appears as a whole phrase wins.
    pub fn from_token(normalized: &str) -> Option<Self> {
        let token = normalized.trim();
        if let Ok(n) = token.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        Self::ALL.into_iter().find(|method| {
            method
                .synonyms()
                .iter()
                .any(|s| contains_phrase(token, s))
        })
    }

    /// Method-specific instructions sent right after selection.
    pub fn instructions(&self, bank_account: &str) -> String {
        match self {
            Self::Cash => "Pagarás en efectivo al recibir tu pedido. Ten el monto exacto si es posible.".to_string(),
            Self::Card => "El repartidor llevará un POS para pagar con tarjeta de crédito o débito.".to_string(),
            Self::Yape => "Yapea el total al número del negocio y envía la captura del pago por este chat.".to_string(),
            Self::Plin => "Envía el total por Plin al número del negocio y comparte la captura del pago por este chat.".to_string(),
            Self::MercadoPago => "Te enviaremos un enlace de Mercado Pago para completar el pago.".to_string(),
            Self::BankTransfer => format!(
                "Realiza la transferencia a la cuenta {} y envía el comprobante por este chat.",
                bank_account
            ),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
