use crate::error::ExtractError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Locator {
    source: String,
    selector: Selector,
}

impl Locator {
    pub fn parse(source: &str) -> Result<Self, ExtractError> {
        let selector = Selector::parse(source).map_err(|err| ExtractError::InvalidLocator {
            locator: source.to_string(),
            reason: format!("{err:?}"),
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

pub struct DocumentSource {
    html: Html,
}

impl DocumentSource {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn find_first(&self, locator: &Locator) -> Option<ElementRef<'_>> {
        self.html.select(locator.selector()).next()
    }
}

impl From<Html> for DocumentSource {
    fn from(html: Html) -> Self {
        Self { html }
    }
}
