use crate::document::Locator;
use crate::error::ExtractError;
use crate::model::FieldKey;
use std::collections::HashSet;

pub const CURRENCY_HINT: &str = r#"[itemprop="priceCurrency"]"#;

pub static FULL_TABLE: &[(FieldKey, &[&str])] = &[
    (FieldKey::ArticleId, &["#descItemNumber"]),
    (FieldKey::Description, &["#itemTitle"]),
    (FieldKey::Condition, &["#vi-itm-cond"]),
    (FieldKey::EndTime, &["#bb_tlft > span.vi-tm-left", "#bb_tlft"]),
    (
        FieldKey::BidPrice,
        &["#prcIsum_bidPrice", "div.vi-price-np > span"],
    ),
    (FieldKey::BuyPrice, &["#prcIsum"]),
    (FieldKey::PaymentMethods, &["#payDet1"]),
    (FieldKey::ShippingCost, &["#fshippingCost"]),
    (FieldKey::ShippingMethods, &["#fShippingSvc"]),
    (FieldKey::AuctionState, &["#msgPanel"]),
    (FieldKey::BidCount, &["#qty-test"]),
    (FieldKey::MinimumBid, &["#MaxBidId"]),
    (FieldKey::Image, &["#icImg"]),
];

pub static REFRESH_TABLE: &[(FieldKey, &[&str])] = &[
    (FieldKey::ArticleId, &["#descItemNumber"]),
    (
        FieldKey::BidPrice,
        &["#prcIsum_bidPrice", ".vi-VR-cvipPrice"],
    ),
    (FieldKey::BidCount, &["#qty-test"]),
    (FieldKey::MinimumBid, &["#MaxBidId"]),
    (FieldKey::AuctionState, &["#msgPanel"]),
];

#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub key: FieldKey,
    pub locators: Vec<Locator>,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    entries: Vec<FieldEntry>,
}

impl FieldSpec {
    pub fn full() -> Result<Self, ExtractError> {
        Self::from_table(FULL_TABLE.iter().copied())
    }

    pub fn refresh() -> Result<Self, ExtractError> {
        Self::from_table(REFRESH_TABLE.iter().copied())
    }

    pub fn from_table<L, S>(table: impl IntoIterator<Item = (FieldKey, L)>) -> Result<Self, ExtractError>
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (key, locators) in table {
            if key.is_derived() {
                return Err(ExtractError::InvalidFieldSpec(format!(
                    "{key} is derived from another field and cannot have locators"
                )));
            }
            if !seen.insert(key) {
                return Err(ExtractError::InvalidFieldSpec(format!(
                    "{key} listed more than once"
                )));
            }

            let locators = locators
                .into_iter()
                .map(|raw| Locator::parse(raw.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            if locators.is_empty() {
                return Err(ExtractError::InvalidFieldSpec(format!(
                    "{key} has no locators"
                )));
            }

            entries.push(FieldEntry { key, locators });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
