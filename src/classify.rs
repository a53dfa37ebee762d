use crate::model::AuctionEndState;
use tracing::debug;

pub struct TriggerPhrases {
    pub state: AuctionEndState,
    pub languages: &'static [(&'static str, &'static [&'static str])],
}

// Match priority order; `Unknown` is only ever the default.
pub static END_STATE_PHRASES: [TriggerPhrases; 3] = [
    TriggerPhrases {
        state: AuctionEndState::Ended,
        languages: &[
            ("de", &["Dieses Angebot wurde beendet"]),
            ("en", &["Bidding has ended on this item"]),
        ],
    },
    TriggerPhrases {
        state: AuctionEndState::Purchased,
        languages: &[
            ("de", &["Sie waren der Höchstbietende"]),
            ("en", &["You won this auction"]),
        ],
    },
    TriggerPhrases {
        state: AuctionEndState::Overbid,
        languages: &[
            (
                "de",
                &[
                    "Sie wurden überboten",
                    "Mindestpreis wurde noch nicht erreicht",
                    "Sie waren nicht der Höchstbietende bei dieser Auktion.",
                ],
            ),
            (
                "en",
                &["You've been outbid", "You didn't win this auction."],
            ),
        ],
    },
];

pub fn classify(text: &str) -> AuctionEndState {
    if text.is_empty() {
        return AuctionEndState::Unknown;
    }

    for entry in &END_STATE_PHRASES {
        for (lang, phrases) in entry.languages {
            if let Some(phrase) = phrases.iter().find(|phrase| text.contains(**phrase)) {
                debug!(lang, phrase, state = ?entry.state, "auction end state determined");
                return entry.state;
            }
        }
    }

    AuctionEndState::Unknown
}

pub fn classify_opt(text: Option<&str>) -> AuctionEndState {
    text.map(classify).unwrap_or_default()
}
