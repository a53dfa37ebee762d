use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page has no {0} element")]
    MissingMarker(String),

    #[error("page marker element carries no itemtype")]
    MissingItemType,

    #[error("unexpected itemtype on page marker: {0}")]
    UnexpectedItemType(String),

    #[error("bidding already performed for this item")]
    BiddingCompleted,

    #[error("invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("invalid field table: {0}")]
    InvalidFieldSpec(String),

    #[error("sanitize failed: {0}")]
    Sanitize(String),
}

impl ExtractError {
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExtractError::MissingMarker(_)
                | ExtractError::MissingItemType
                | ExtractError::UnexpectedItemType(_)
                | ExtractError::BiddingCompleted
        )
    }
}
