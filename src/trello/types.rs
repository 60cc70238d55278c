//! Trello API response types
//!
//! Common types used across multiple Trello API endpoints. Only the fields
//! the server actually consumes are modeled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Trello board
///
/// `id` is the canonical 24-character identifier. The API accepts short
/// links as lookup keys too, but always reports the canonical `id` back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub short_link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
}

/// Trello card
///
/// `id_board` is the owning board at the time of the fetch; cards can be
/// moved between boards, so this relation must never be cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub id_board: String,
    pub id_list: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pos: Option<f64>,
}

/// Trello list
///
/// Named `TrelloList` to avoid clashing with the ubiquitous `Vec`-adjacent
/// meaning of "list". Same ownership caveat as [`Card`]: `id_board` is only
/// valid for the request that fetched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloList {
    pub id: String,
    pub name: String,
    pub id_board: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pos: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "cardid000000000000000001",
            "name": "Fix the widget",
            "idBoard": "boardid00000000000000001",
            "idList": "listid000000000000000001",
            "closed": false
        });
        let card: Card = serde_json::from_value(json).unwrap();
        assert_eq!(card.id_board, "boardid00000000000000001");
        assert_eq!(card.id_list, "listid000000000000000001");
        assert_eq!(card.desc, "");
    }

    #[test]
    fn test_board_tolerates_missing_optionals() {
        let json = serde_json::json!({
            "id": "boardid00000000000000001",
            "name": "Roadmap"
        });
        let board: Board = serde_json::from_value(json).unwrap();
        assert!(!board.closed);
        assert!(board.short_link.is_none());
    }
}
