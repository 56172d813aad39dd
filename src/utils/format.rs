//! Display helpers shared by the email templates.

use bigdecimal::BigDecimal;

use crate::domain::LineItem;

pub const MASK_CHAR: char = '*';
const MASK_VISIBLE_EDGE: usize = 2;
const MASK_MIN_LEN: usize = 4;

/// Masks a ticket code, keeping only the first and last two characters.
///
/// Codes of four characters or fewer are fully replaced by `****`.
pub fn mask_code(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() <= MASK_MIN_LEN {
        return MASK_CHAR.to_string().repeat(MASK_MIN_LEN);
    }

    let head: String = chars[..MASK_VISIBLE_EDGE].iter().collect();
    let tail: String = chars[chars.len() - MASK_VISIBLE_EDGE..].iter().collect();
    let hidden = MASK_CHAR.to_string().repeat(chars.len() - MASK_MIN_LEN);

    format!("{}{}{}", head, hidden, tail)
}

/// Formats an amount with exactly two decimal places.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}

pub fn total_of(items: &[LineItem]) -> BigDecimal {
    items
        .iter()
        .fold(BigDecimal::from(0), |acc, item| acc + &item.amount)
}

/// Sum of all line items, two decimals, without currency.
pub fn format_total(items: &[LineItem]) -> String {
    format_amount(&total_of(items))
}

/// `"30.75 EUR"`
pub fn format_money(amount: &BigDecimal, currency: &str) -> String {
    format!("{} {}", format_amount(amount), currency)
}
