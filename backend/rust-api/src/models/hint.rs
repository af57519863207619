use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::letter::AnswerLetter;

/// The three lifelines a player can spend during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    AudienceHelp,
    FiftyFifty,
    FriendCall,
}

impl HintKind {
    pub const ALL: [HintKind; 3] = [
        HintKind::AudienceHelp,
        HintKind::FiftyFifty,
        HintKind::FriendCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HintKind::AudienceHelp => "audience_help",
            HintKind::FiftyFifty => "fifty_fifty",
            HintKind::FriendCall => "friend_call",
        }
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HintKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown hint '{}'", s))
    }
}

/// Payload stored under a hint name in a question's help hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintPayload {
    /// Vote percentage per letter, summing to 100.
    Audience(BTreeMap<AnswerLetter, u8>),
    /// The two letters left after elimination.
    FiftyFifty(BTreeSet<AnswerLetter>),
    /// The friend's message.
    FriendCall(String),
}

pub type HelpHash = BTreeMap<HintKind, HintPayload>;

#[derive(Debug, Deserialize)]
pub struct UseHelpRequest {
    pub help_type: HintKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_kind_round_trips_through_its_name() {
        for kind in HintKind::ALL {
            assert_eq!(kind.as_str().parse::<HintKind>(), Ok(kind));
        }
        assert!("phone_a_friend".parse::<HintKind>().is_err());
    }

    #[test]
    fn payload_serializes_without_tag() {
        let mut hash = HelpHash::new();
        hash.insert(
            HintKind::FiftyFifty,
            HintPayload::FiftyFifty([AnswerLetter::A, AnswerLetter::C].into_iter().collect()),
        );
        hash.insert(
            HintKind::FriendCall,
            HintPayload::FriendCall("hello".to_string()),
        );

        let json = serde_json::to_value(&hash).unwrap();
        assert_eq!(json["fifty_fifty"], serde_json::json!(["a", "c"]));
        assert_eq!(json["friend_call"], "hello");
    }
}
