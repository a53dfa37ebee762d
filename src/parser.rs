use crate::document::{DocumentSource, Locator};
use crate::end_time::parse_end_time;
use crate::error::ExtractError;
use crate::fields::{CURRENCY_HINT, FieldSpec};
use crate::model::{FieldKey, FieldKind, FieldMap, FieldValue, PriceAmount};
use crate::price::{PriceSource, parse_price};
use crate::sanitize::{plain_text, sanitize};
use chrono_tz::Tz;
use scraper::ElementRef;
use scraper::node::Node;
use tracing::{debug, warn};
use url::Url;

pub const MINIMUM_BID_ATTRIBUTE: &str = "aria-label";

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    currency_hint: Locator,
    timezone: Tz,
    base_url: Option<Url>,
}

impl FieldExtractor {
    pub fn new(timezone: Tz) -> Result<Self, ExtractError> {
        Ok(Self {
            currency_hint: Locator::parse(CURRENCY_HINT)?,
            timezone,
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, source_url: &str) -> Self {
        self.base_url = Url::parse(source_url).ok();
        self
    }

    pub fn extract(&self, doc: &DocumentSource, spec: &FieldSpec) -> FieldMap {
        let mut fields = FieldMap::default();

        for entry in spec.entries() {
            let matched = entry
                .locators
                .iter()
                .enumerate()
                .find_map(|(index, locator)| match doc.find_first(locator) {
                    Some(element) => Some((index, locator, element)),
                    None => {
                        debug!(field = %entry.key, %locator, "no element for locator");
                        None
                    }
                });

            let Some((index, locator, element)) = matched else {
                debug!(field = %entry.key, "field absent; no locator matched");
                continue;
            };

            // The first match decides the field, even if its content cannot be shaped.
            fields.record_match(entry.key, index);
            match self.shape(entry.key, element, doc, &mut fields) {
                Some(value) => fields.insert(entry.key, value),
                None => warn!(
                    field = %entry.key,
                    %locator,
                    "matched element could not be shaped; field left absent"
                ),
            }
        }

        fields
    }

    fn shape(
        &self,
        key: FieldKey,
        element: ElementRef<'_>,
        doc: &DocumentSource,
        fields: &mut FieldMap,
    ) -> Option<FieldValue> {
        match key.kind() {
            FieldKind::Text => non_empty(collapse_whitespace(&element_text(element))).map(FieldValue::Text),
            FieldKind::Description => non_empty(direct_text(element)).map(FieldValue::Text),
            FieldKind::Price => {
                let price = parse_price(
                    PriceSource::Element(element),
                    doc.find_first(&self.currency_hint),
                );
                if !fields.contains(FieldKey::Currency)
                    && let Some(currency) = &price.currency
                {
                    fields.insert(FieldKey::Currency, FieldValue::Text(currency.clone()));
                }
                price_value(price)
            }
            FieldKind::EndTime => parse_end_time(element, self.timezone).map(FieldValue::Instant),
            FieldKind::MinimumBid => {
                let label = element.value().attr(MINIMUM_BID_ATTRIBUTE)?;
                let label = collapse_whitespace(label);
                price_value(parse_price(
                    PriceSource::Text(&label),
                    doc.find_first(&self.currency_hint),
                ))
            }
            FieldKind::Count => leading_integer(&element_text(element)).map(FieldValue::Count),
            FieldKind::AuctionState => {
                let markup = sanitize(&element.html());
                let text = plain_text(&markup);
                if !text.is_empty() {
                    fields.insert(FieldKey::AuctionStateText, FieldValue::Text(text));
                }
                Some(FieldValue::Text(markup))
            }
            FieldKind::Image => {
                let src = element.value().attr("src")?.trim();
                non_empty(absolutize_url(self.base_url.as_ref(), src)).map(FieldValue::Text)
            }
            FieldKind::PaymentMethods => payment_methods(element).map(FieldValue::List),
            FieldKind::Derived => None,
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.replace('\n', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn direct_text(element: ElementRef<'_>) -> String {
    let joined = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(text.trim().to_string()),
            _ => None,
        })
        .collect::<String>();
    collapse_whitespace(&joined)
}

fn payment_methods(element: ElementRef<'_>) -> Option<Vec<String>> {
    let mut methods = collapse_whitespace(&element_text(element))
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    for image in element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "img")
    {
        let Some(alt) = image.value().attr("alt") else {
            warn!("payment method image without alt text; dropping payment methods");
            return None;
        };
        methods.push(alt.trim().to_string());
    }

    if methods.is_empty() { None } else { Some(methods) }
}

fn price_value(price: PriceAmount) -> Option<FieldValue> {
    if price.amount.is_some() {
        Some(FieldValue::Price(price))
    } else {
        None
    }
}

fn leading_integer(text: &str) -> Option<u32> {
    text.trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse::<u32>()
        .ok()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

pub fn absolutize_url(base_url: Option<&Url>, value: &str) -> String {
    if value.starts_with("http://") || value.starts_with("https://") {
        return value.to_string();
    }

    if let Some(base) = base_url
        && let Ok(joined) = base.join(value)
    {
        return joined.to_string();
    }

    value.to_string()
}
