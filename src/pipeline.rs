use crate::classify::classify_opt;
use crate::config::ParserConfig;
use crate::document::{DocumentSource, Locator};
use crate::error::ExtractError;
use crate::fields::FieldSpec;
use crate::model::{ArticleSnapshot, FieldKey, FieldMap, PriorInfo};
use crate::parser::FieldExtractor;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const PAGE_MARKER: &str = "#Body";
pub const EXPECTED_ITEM_TYPE: &str = "https://schema.org/Product";

static PLATFORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:www|cgi)\.(ebay\..*?)/").expect("platform regex must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Full,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct ArticleParser {
    full: FieldSpec,
    refresh: FieldSpec,
    extractor: FieldExtractor,
    marker: Locator,
    default_platform: String,
}

impl ArticleParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            full: config.full_spec()?,
            refresh: config.refresh_spec()?,
            extractor: FieldExtractor::new(config.timezone()?)?,
            marker: Locator::parse(PAGE_MARKER)?,
            default_platform: config.default_platform.clone(),
        })
    }

    pub fn spec(&self, mode: ParseMode) -> &FieldSpec {
        match mode {
            ParseMode::Full => &self.full,
            ParseMode::Refresh => &self.refresh,
        }
    }

    pub fn check_page(
        &self,
        doc: &DocumentSource,
        prior: Option<&PriorInfo>,
    ) -> Result<(), ExtractError> {
        let body = doc
            .find_first(&self.marker)
            .ok_or_else(|| ExtractError::MissingMarker(PAGE_MARKER.to_string()))?;
        let item_type = body
            .value()
            .attr("itemtype")
            .ok_or(ExtractError::MissingItemType)?;
        if item_type != EXPECTED_ITEM_TYPE {
            return Err(ExtractError::UnexpectedItemType(item_type.to_string()));
        }
        if prior.is_some_and(|p| p.auction_ended) {
            return Err(ExtractError::BiddingCompleted);
        }
        Ok(())
    }

    pub fn parse_full(
        &self,
        doc: &DocumentSource,
        source_url: &str,
        prior: Option<&PriorInfo>,
    ) -> Result<ArticleSnapshot, ExtractError> {
        self.check_page(doc, prior)?;
        Ok(self.snapshot(doc, source_url, ParseMode::Full))
    }

    pub fn parse_refresh(
        &self,
        doc: &DocumentSource,
        source_url: &str,
    ) -> Result<ArticleSnapshot, ExtractError> {
        self.check_page(doc, None)?;
        Ok(self.snapshot(doc, source_url, ParseMode::Refresh))
    }

    pub fn extract_fields(&self, doc: &DocumentSource, source_url: &str, mode: ParseMode) -> FieldMap {
        self.extractor
            .clone()
            .with_base_url(source_url)
            .extract(doc, self.spec(mode))
    }

    fn snapshot(&self, doc: &DocumentSource, source_url: &str, mode: ParseMode) -> ArticleSnapshot {
        let fields = self.extract_fields(doc, source_url, mode);
        let platform = platform_from_url(source_url, &self.default_platform);
        let snapshot = assemble(&fields, platform);

        info!(
            mode = ?mode,
            article = snapshot.article_id.as_deref().unwrap_or("-"),
            platform = %snapshot.platform,
            fields = fields.len(),
            end_state = ?snapshot.auction_end_state,
            "parsed article page"
        );

        snapshot
    }
}

pub fn platform_from_url(url: &str, default_platform: &str) -> String {
    match PLATFORM_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
    {
        Some(host) => host.as_str().to_string(),
        None => {
            debug!(%url, default = default_platform, "platform not detectable from url");
            default_platform.to_string()
        }
    }
}

pub fn assemble(fields: &FieldMap, platform: String) -> ArticleSnapshot {
    let auction_state_text = fields.text(FieldKey::AuctionStateText);
    let auction_end_state = classify_opt(auction_state_text.as_deref());

    ArticleSnapshot {
        article_id: fields.text(FieldKey::ArticleId),
        description: fields.text(FieldKey::Description),
        condition: fields.text(FieldKey::Condition),
        end_time: fields.instant(FieldKey::EndTime),
        bid_price: fields.price(FieldKey::BidPrice),
        buy_price: fields.price(FieldKey::BuyPrice),
        currency: fields.text(FieldKey::Currency),
        payment_methods: fields.list(FieldKey::PaymentMethods),
        shipping_cost: fields.text(FieldKey::ShippingCost),
        shipping_methods: fields.text(FieldKey::ShippingMethods),
        auction_state: fields.text(FieldKey::AuctionState),
        auction_state_text,
        auction_end_state,
        bid_count: fields.count(FieldKey::BidCount),
        minimum_bid: fields.price(FieldKey::MinimumBid),
        image: fields.text(FieldKey::Image),
        platform,
    }
}
