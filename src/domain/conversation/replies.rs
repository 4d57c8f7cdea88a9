//! Reply texts sent back to the chat.

use crate::domain::foundation::{format_amount, Money};
use crate::domain::order::{DeliveryType, Order, OrderLineItem, PaymentMethod};
use crate::domain::pricing::MenuEntry;

pub const ITEM_FORMAT_HINT: &str =
    "Escribe el código del producto, por ejemplo: 2 x P1/grande +M1:O2";

pub fn welcome() -> String {
    "¡Hola! Bienvenido. Puedo mostrarte el *menú*, tomar tu *pedido* o ponerte en contacto con *soporte*. ¿Qué deseas hacer?".to_string()
}

pub fn help() -> String {
    "No te entendí. Escribe *menú* para ver la carta, *quiero pedir* para hacer un pedido o *ayuda* para hablar con soporte.".to_string()
}

pub fn farewell() -> String {
    "Conversación finalizada. ¡Gracias por escribirnos! Escríbenos cuando quieras para empezar de nuevo.".to_string()
}

/// Sent when a collaborator fails and the turn could not be processed.
pub fn apology() -> String {
    "Lo sentimos, algo salió mal. Por favor intenta de nuevo en unos momentos.".to_string()
}

pub fn menu(entries: &[MenuEntry], currency_symbol: &str) -> String {
    if entries.is_empty() {
        return "Por ahora no tenemos productos disponibles. Vuelve a intentarlo más tarde."
            .to_string();
    }
    let mut text = String::from("📋 *Menú*\n");
    for entry in entries {
        text.push_str(&format!("• {}\n", entry.describe(currency_symbol)));
    }
    text.push('\n');
    text.push_str(ITEM_FORMAT_HINT);
    text
}

pub fn order_prompt(cart: &[OrderLineItem], total: Money, currency_symbol: &str) -> String {
    if cart.is_empty() {
        format!("¿Qué deseas pedir? {}", ITEM_FORMAT_HINT)
    } else {
        format!(
            "{}\n\n¿Qué más deseas agregar? {}",
            cart_summary(cart, total, currency_symbol),
            ITEM_FORMAT_HINT
        )
    }
}

pub fn item_format_error(reason: &str) -> String {
    format!("No pude leer ese producto ({}). {}", reason, ITEM_FORMAT_HINT)
}

pub fn item_added(cart: &[OrderLineItem], total: Money, currency_symbol: &str) -> String {
    format!(
        "✅ Agregado.\n{}\n\n{}",
        cart_summary(cart, total, currency_symbol),
        confirm_question()
    )
}

pub fn item_not_found(reference: &str) -> String {
    format!(
        "No encontramos el producto \"{}\". Revisa el menú e inténtalo de nuevo.",
        reference
    )
}

pub fn item_rejected(reason: &str) -> String {
    format!("No pudimos agregar ese producto: {}.", reason)
}

pub fn confirm_prompt(cart: &[OrderLineItem], total: Money, currency_symbol: &str) -> String {
    format!(
        "{}\n\n{}",
        cart_summary(cart, total, currency_symbol),
        confirm_question()
    )
}

fn confirm_question() -> &'static str {
    "¿Confirmas tu pedido (*sí*) o deseas *agregar* algo más?"
}

pub fn empty_cart() -> String {
    format!("Tu carrito está vacío. {}", ITEM_FORMAT_HINT)
}

pub fn cart_summary(cart: &[OrderLineItem], total: Money, currency_symbol: &str) -> String {
    let mut text = String::from("🛒 Tu pedido:\n");
    for item in cart {
        text.push_str(&format!("• {}\n", item.describe(currency_symbol)));
    }
    text.push_str(&format!("Total: {}", format_amount(currency_symbol, total)));
    text
}

pub fn payment_prompt(total: Money, currency_symbol: &str) -> String {
    let mut text = format!(
        "Total a pagar: {}\n¿Cómo deseas pagar?\n",
        format_amount(currency_symbol, total)
    );
    for method in PaymentMethod::ALL {
        text.push_str(&format!("{}. {}\n", method.number(), method.label()));
    }
    text.push_str("Responde con el número o el nombre del método.");
    text
}

pub fn payment_selected(method: PaymentMethod, instructions: &str) -> String {
    format!("💳 Método de pago: {}\n{}", method.label(), instructions)
}

pub fn delivery_mode_prompt() -> String {
    let mut text = String::from("¿Cómo deseas recibir tu pedido?\n");
    for (i, mode) in DeliveryType::ALL.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, mode.label()));
    }
    text.push_str("Responde con el número o el nombre de la opción.");
    text
}

pub fn date_prompt() -> String {
    "¿Para qué fecha lo programamos? Escribe la fecha como DD/MM/AAAA o *hoy*.".to_string()
}

pub fn invalid_date(reason: &str) -> String {
    format!("Fecha no válida ({}). {}", reason, date_prompt())
}

pub fn street_prompt() -> String {
    "📍 ¿Cuál es la dirección de entrega? (calle y número)".to_string()
}

pub fn city_prompt() -> String {
    "¿En qué ciudad?".to_string()
}

pub fn district_prompt() -> String {
    "¿En qué distrito?".to_string()
}

pub fn postal_code_prompt() -> String {
    "¿Código postal? (opcional, envía un mensaje vacío o *no* para omitir)".to_string()
}

pub fn field_required(prompt: String) -> String {
    format!("Este dato es obligatorio. {}", prompt)
}

pub fn address_invalid(reason: &str) -> String {
    format!(
        "La dirección no es válida ({}). Empecemos de nuevo.\n{}",
        reason,
        street_prompt()
    )
}

/// Confirmation sent once the order has been stored.
pub fn order_placed(order: &Order, currency_symbol: &str, pickup_instructions: &str) -> String {
    let reference = order
        .id
        .map(|id| id.short_ref())
        .unwrap_or_default();
    let mut text = format!("🎉 ¡Pedido #{} registrado!\n", reference);
    for item in &order.items {
        text.push_str(&format!("• {}\n", item.describe(currency_symbol)));
    }
    text.push_str(&format!(
        "Subtotal: {}\n",
        format_amount(currency_symbol, order.subtotal)
    ));
    if order.tax > Money::ZERO {
        text.push_str(&format!("Impuestos: {}\n", format_amount(currency_symbol, order.tax)));
    }
    if order.delivery_fee > Money::ZERO {
        text.push_str(&format!(
            "Delivery: {}\n",
            format_amount(currency_symbol, order.delivery_fee)
        ));
    }
    text.push_str(&format!("Total: {}\n", format_amount(currency_symbol, order.total)));
    text.push_str(&format!("Pago: {}\n", order.payment_method.label()));
    match &order.delivery_info {
        Some(info) if info.delivery_type == DeliveryType::Pickup => {
            text.push_str(&format!("Recojo en tienda: {}", pickup_instructions));
        }
        Some(info) => {
            if let Some(address) = &info.address {
                text.push_str(&format!("Entrega en: {}", address.one_line()));
            }
            if let Some(date) = info.scheduled_for {
                text.push_str(&format!("\nFecha programada: {}", date.format("%d/%m/%Y")));
            }
        }
        None => {}
    }
    text
}

pub fn issue_prompt() -> String {
    "🛟 Cuéntanos cuál es el problema y te ayudaremos.".to_string()
}

pub fn contact_prompt() -> String {
    "¿A qué número o nombre de contacto podemos comunicarnos contigo?".to_string()
}

pub fn email_prompt() -> String {
    "¿Tienes un correo electrónico? (opcional, escribe *no* para omitir)".to_string()
}

pub fn support_summary(issue: &str, contact: &str, email: Option<&str>) -> String {
    format!(
        "📝 Solicitud registrada:\nProblema: {}\nContacto: {}\nCorreo: {}\nUn asesor se comunicará contigo pronto.",
        issue,
        contact,
        email.unwrap_or("no indicado")
    )
}
