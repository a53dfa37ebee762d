use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceAmount {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionEndState {
    Ended,
    Purchased,
    Overbid,
    #[default]
    Unknown,
}

impl AuctionEndState {
    pub fn id(&self) -> Option<u8> {
        match self {
            AuctionEndState::Ended => Some(0),
            AuctionEndState::Purchased => Some(1),
            AuctionEndState::Overbid => Some(2),
            AuctionEndState::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuctionEndState::Ended => "Ended",
            AuctionEndState::Purchased => "Purchased",
            AuctionEndState::Overbid => "Overbid",
            AuctionEndState::Unknown => "Still unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    ArticleId,
    Description,
    Condition,
    EndTime,
    BidPrice,
    BuyPrice,
    PaymentMethods,
    ShippingCost,
    ShippingMethods,
    AuctionState,
    AuctionStateText,
    BidCount,
    MinimumBid,
    Image,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Description,
    Price,
    EndTime,
    MinimumBid,
    Count,
    AuctionState,
    Image,
    PaymentMethods,
    Derived,
}

impl FieldKey {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::ArticleId
            | FieldKey::Condition
            | FieldKey::ShippingCost
            | FieldKey::ShippingMethods => FieldKind::Text,
            FieldKey::Description => FieldKind::Description,
            FieldKey::EndTime => FieldKind::EndTime,
            FieldKey::BidPrice | FieldKey::BuyPrice => FieldKind::Price,
            FieldKey::MinimumBid => FieldKind::MinimumBid,
            FieldKey::BidCount => FieldKind::Count,
            FieldKey::AuctionState => FieldKind::AuctionState,
            FieldKey::Image => FieldKind::Image,
            FieldKey::PaymentMethods => FieldKind::PaymentMethods,
            FieldKey::AuctionStateText | FieldKey::Currency => FieldKind::Derived,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.kind() == FieldKind::Derived
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::ArticleId => "article_id",
            FieldKey::Description => "description",
            FieldKey::Condition => "condition",
            FieldKey::EndTime => "end_time",
            FieldKey::BidPrice => "bid_price",
            FieldKey::BuyPrice => "buy_price",
            FieldKey::PaymentMethods => "payment_methods",
            FieldKey::ShippingCost => "shipping_cost",
            FieldKey::ShippingMethods => "shipping_methods",
            FieldKey::AuctionState => "auction_state",
            FieldKey::AuctionStateText => "auction_state_text",
            FieldKey::BidCount => "bid_count",
            FieldKey::MinimumBid => "minimum_bid",
            FieldKey::Image => "image",
            FieldKey::Currency => "currency",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Price(PriceAmount),
    Instant(DateTime<Utc>),
    Count(u32),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    values: BTreeMap<FieldKey, FieldValue>,
    matched_locator: BTreeMap<FieldKey, usize>,
}

impl FieldMap {
    pub fn insert(&mut self, key: FieldKey, value: FieldValue) {
        self.values.insert(key, value);
    }

    pub fn record_match(&mut self, key: FieldKey, locator_index: usize) {
        self.matched_locator.insert(key, locator_index);
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn matched_locator(&self, key: FieldKey) -> Option<usize> {
        self.matched_locator.get(&key).copied()
    }

    pub fn text(&self, key: FieldKey) -> Option<String> {
        match self.values.get(&key) {
            Some(FieldValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn price(&self, key: FieldKey) -> Option<PriceAmount> {
        match self.values.get(&key) {
            Some(FieldValue::Price(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn instant(&self, key: FieldKey) -> Option<DateTime<Utc>> {
        match self.values.get(&key) {
            Some(FieldValue::Instant(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn count(&self, key: FieldKey) -> Option<u32> {
        match self.values.get(&key) {
            Some(FieldValue::Count(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn list(&self, key: FieldKey) -> Option<Vec<String>> {
        match self.values.get(&key) {
            Some(FieldValue::List(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorInfo {
    #[serde(default)]
    pub auction_ended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSnapshot {
    pub article_id: Option<String>,
    pub description: Option<String>,
    pub condition: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    pub bid_price: Option<PriceAmount>,
    pub buy_price: Option<PriceAmount>,
    pub currency: Option<String>,
    pub payment_methods: Option<Vec<String>>,
    pub shipping_cost: Option<String>,
    pub shipping_methods: Option<String>,
    pub auction_state: Option<String>,
    pub auction_state_text: Option<String>,
    pub auction_end_state: AuctionEndState,
    pub bid_count: Option<u32>,
    pub minimum_bid: Option<PriceAmount>,
    pub image: Option<String>,
    pub platform: String,
}

impl ArticleSnapshot {
    pub fn currency_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(default)
    }

    pub fn with_default_currency(mut self, default: &str) -> Self {
        if self.currency.is_none() {
            self.currency = Some(default.to_string());
        }
        self
    }

    pub fn payment_methods_text(&self) -> Option<String> {
        self.payment_methods.as_ref().map(|methods| methods.join(", "))
    }

    pub fn bid_amount(&self) -> Option<f64> {
        self.bid_price.as_ref().and_then(|p| p.amount)
    }

    pub fn minimum_bid_amount(&self) -> Option<f64> {
        self.minimum_bid.as_ref().and_then(|p| p.amount)
    }

    pub fn merged_with(&self, newer: &ArticleSnapshot) -> ArticleSnapshot {
        let state_refreshed = newer.auction_state_text.is_some();
        ArticleSnapshot {
            article_id: newer.article_id.clone().or_else(|| self.article_id.clone()),
            description: newer.description.clone().or_else(|| self.description.clone()),
            condition: newer.condition.clone().or_else(|| self.condition.clone()),
            end_time: newer.end_time.or(self.end_time),
            bid_price: newer.bid_price.clone().or_else(|| self.bid_price.clone()),
            buy_price: newer.buy_price.clone().or_else(|| self.buy_price.clone()),
            currency: newer.currency.clone().or_else(|| self.currency.clone()),
            payment_methods: newer
                .payment_methods
                .clone()
                .or_else(|| self.payment_methods.clone()),
            shipping_cost: newer.shipping_cost.clone().or_else(|| self.shipping_cost.clone()),
            shipping_methods: newer
                .shipping_methods
                .clone()
                .or_else(|| self.shipping_methods.clone()),
            auction_state: newer.auction_state.clone().or_else(|| self.auction_state.clone()),
            auction_state_text: newer
                .auction_state_text
                .clone()
                .or_else(|| self.auction_state_text.clone()),
            auction_end_state: if state_refreshed {
                newer.auction_end_state
            } else {
                self.auction_end_state
            },
            bid_count: newer.bid_count.or(self.bid_count),
            minimum_bid: newer.minimum_bid.clone().or_else(|| self.minimum_bid.clone()),
            image: newer.image.clone().or_else(|| self.image.clone()),
            platform: newer.platform.clone(),
        }
    }
}
