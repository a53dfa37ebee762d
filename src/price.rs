use crate::model::PriceAmount;
use crate::parser::collapse_whitespace;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use tracing::debug;

// prefix (currency, ignored) | integer part with optional thousands groups | two fraction digits
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)(\d{1,3}(?:[.,' \x{a0}]\d{3})+|\d+)[.,](\d{2})(?:\D|$)")
        .expect("price regex must compile")
});

pub const AMOUNT_ATTRIBUTE: &str = "content";

#[derive(Debug, Clone, Copy)]
pub enum PriceSource<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

pub fn parse_price(source: PriceSource<'_>, currency_hint: Option<ElementRef<'_>>) -> PriceAmount {
    let currency = currency_hint.and_then(currency_from_hint);

    let amount = match source {
        PriceSource::Text(text) => parse_price_text(text),
        PriceSource::Element(element) => {
            let text = collapse_whitespace(&element.text().collect::<String>());
            parse_price_text(&text).or_else(|| amount_from_attribute(element))
        }
    };

    if amount.is_none() {
        debug!("price text did not match and no numeric fallback was available");
    }

    PriceAmount { amount, currency }
}

pub fn parse_price_text(text: &str) -> Option<f64> {
    let caps = PRICE_PATTERN.captures(text.trim())?;
    let integer = caps
        .get(2)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    let fraction = caps.get(3)?.as_str();
    format!("{integer}.{fraction}")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn amount_from_attribute(element: ElementRef<'_>) -> Option<f64> {
    element
        .value()
        .attr(AMOUNT_ATTRIBUTE)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn currency_from_hint(hint: ElementRef<'_>) -> Option<String> {
    hint.value()
        .attr(AMOUNT_ATTRIBUTE)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
