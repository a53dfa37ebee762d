use anyhow::Result;
use auction_snap::config::{ParserConfig, load_config, parse_config};
use auction_snap::document::DocumentSource;
use auction_snap::model::FieldKey;
use auction_snap::pipeline::{ArticleParser, ParseMode};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::tempdir;

#[test]
fn defaults_apply_when_file_is_empty() -> Result<()> {
    let config = parse_config("")?;

    assert_eq!(config.default_platform, "ebay.de");
    assert_eq!(config.default_currency, "EUR");
    assert_eq!(config.timezone()?, chrono_tz::Europe::Berlin);
    assert_eq!(config.full_spec()?.len(), 13);
    assert_eq!(config.refresh_spec()?.len(), 5);
    Ok(())
}

#[test]
fn loads_overrides_from_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("parser.toml");
    fs::write(
        &path,
        r##"
default_platform = "ebay.co.uk"
default_currency = "GBP"
timezone = "Europe/London"

[[full_fields]]
key = "article_id"
locators = ["#itemNumber", "#descItemNumber"]

[[full_fields]]
key = "end_time"
locators = ["#endsAt"]

[[refresh_fields]]
key = "bid_count"
locators = ["#bids"]
"##,
    )?;

    let config = load_config(&path)?;
    let parser = ArticleParser::new(&config)?;

    assert_eq!(parser.spec(ParseMode::Full).len(), 2);
    assert_eq!(
        parser.spec(ParseMode::Refresh).keys().collect::<Vec<_>>(),
        vec![FieldKey::BidCount]
    );

    let doc = DocumentSource::parse(
        r#"<div id="Body" itemtype="https://schema.org/Product">
             <div id="descItemNumber">555</div>
             <span id="endsAt">08. Dez. 2019 17:30:42 GMT</span>
           </div>"#,
    );
    let snapshot = parser.parse_full(&doc, "file:///tmp/page.html", None)?;

    assert_eq!(snapshot.article_id.as_deref(), Some("555"));
    assert_eq!(
        snapshot.end_time,
        Utc.with_ymd_and_hms(2019, 12, 8, 17, 30, 42).single()
    );
    assert_eq!(snapshot.platform, "ebay.co.uk");
    assert_eq!(snapshot.currency, None);
    assert_eq!(snapshot.currency_or(&config.default_currency), "GBP");

    let resolved = snapshot.with_default_currency(&config.default_currency);
    assert_eq!(resolved.currency.as_deref(), Some("GBP"));
    Ok(())
}

#[test]
fn page_currency_wins_over_configured_default() -> Result<()> {
    let config = parse_config(r#"default_currency = "GBP""#)?;
    let parser = ArticleParser::new(&config)?;
    let doc = DocumentSource::parse(
        r#"<div id="Body" itemtype="https://schema.org/Product">
             <span id="prcIsum_bidPrice">US $12.00</span>
             <span itemprop="priceCurrency" content="USD"></span>
           </div>"#,
    );

    let snapshot = parser
        .parse_full(&doc, "https://www.ebay.com/itm/1", None)?
        .with_default_currency(&config.default_currency);

    assert_eq!(snapshot.currency.as_deref(), Some("USD"));
    Ok(())
}

#[test]
fn rejects_locators_for_derived_fields() {
    let err = parse_config(
        r##"
[[full_fields]]
key = "auction_state_text"
locators = ["#status"]
"##,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("auction_state_text"));
}

#[test]
fn rejects_unknown_timezone() {
    let err = parse_config(r#"timezone = "Mars/Olympus""#).unwrap_err();
    assert!(format!("{err:#}").contains("Mars/Olympus"));
}

#[test]
fn rejects_invalid_locator() {
    let err = parse_config(
        r###"
[[refresh_fields]]
key = "bid_price"
locators = ["##broken"]
"###,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("##broken"));
}

#[test]
fn rejects_duplicate_and_empty_rules() {
    let duplicate = parse_config(
        r##"
[[full_fields]]
key = "image"
locators = ["#icImg"]

[[full_fields]]
key = "image"
locators = ["#mainImg"]
"##,
    );
    assert!(duplicate.is_err());

    let empty = parse_config(
        r#"
[[full_fields]]
key = "image"
locators = []
"#,
    );
    assert!(empty.is_err());
}

#[test]
fn rule_errors_name_the_table_section() {
    let err = parse_config(
        r##"
[[refresh_fields]]
key = "bid_count"
locators = ["#bids"]

[[refresh_fields]]
key = "bid_count"
locators = ["#qty"]
"##,
    )
    .unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("refresh_fields"));
    assert!(message.contains("bid_count listed more than once"));
}

#[test]
fn rejects_unknown_field_key() {
    let result = parse_config(
        r##"
[[full_fields]]
key = "seller_rating"
locators = ["#rating"]
"##,
    );
    assert!(result.is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(std::path::Path::new("/nonexistent/parser.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/parser.toml"));
}

#[test]
fn default_config_is_valid() -> Result<()> {
    ParserConfig::default().validate()?;
    Ok(())
}
