//! Board access gate
//!
//! The single authoritative allow/deny decision path. Board identifiers are
//! normalized to canonical form (with caching) before the membership check;
//! card and list operations resolve their owning board first and delegate.
//!
//! For any single request the gate check completes strictly before the
//! corresponding mutation call: tools run `check_access` to completion before
//! `execute` starts. A lookup that fails or times out surfaces as an error,
//! never as a silent permit.

use crate::access_control::cache::{BoardIdCache, InMemoryBoardIdCache};
use crate::access_control::policy::BoardPolicy;
use crate::error::{AccessDeniedError, EntityKind, GateError, GateResult, TrelloResult};
use crate::trello::types::{Board, Card, TrelloList};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Entity lookups the gate needs from the resource layer.
///
/// Implemented by the Trello client; tests substitute a fake to count
/// remote calls and to simulate failures.
#[async_trait]
pub trait BoardLookup: Send + Sync {
    async fn board(&self, id: &str) -> TrelloResult<Board>;
    async fn card(&self, id: &str) -> TrelloResult<Card>;
    async fn list(&self, id: &str) -> TrelloResult<TrelloList>;
}

/// Board access gate
///
/// Holds the allow-list policy, the identifier cache, and the lookup seam.
/// Constructed once at startup and shared across requests.
pub struct BoardAccessGate {
    lookup: Arc<dyn BoardLookup>,
    cache: Arc<dyn BoardIdCache>,
    policy: BoardPolicy,
}

impl BoardAccessGate {
    /// Create a gate with the default in-memory identifier cache
    pub fn new(lookup: Arc<dyn BoardLookup>, policy: BoardPolicy) -> Self {
        Self::with_cache(lookup, policy, Arc::new(InMemoryBoardIdCache::new()))
    }

    /// Create a gate with an injected cache (tests use a counting fake)
    pub fn with_cache(
        lookup: Arc<dyn BoardLookup>,
        policy: BoardPolicy,
        cache: Arc<dyn BoardIdCache>,
    ) -> Self {
        Self {
            lookup,
            cache,
            policy,
        }
    }

    /// The policy this gate enforces
    pub fn policy(&self) -> &BoardPolicy {
        &self.policy
    }

    /// Resolve any accepted board identifier form to the canonical id.
    ///
    /// Results are memoized for the process lifetime; failures are not
    /// cached, so a transient lookup error stays retryable. Concurrent
    /// resolutions of the same uncached input may each reach the API, but
    /// they produce the same canonical id and converge to a single cache
    /// entry via insert-if-absent.
    pub async fn resolve_canonical_board_id(
        &self,
        input: &str,
        operation: &str,
    ) -> GateResult<String> {
        if let Some(canonical) = self.cache.get(input) {
            trace!(input, canonical, "Board id resolved from cache");
            return Ok(canonical);
        }

        let board = self
            .lookup
            .board(input)
            .await
            .map_err(|source| GateError::BoardNotResolvable {
                board: input.to_string(),
                operation: operation.to_string(),
                source,
            })?;

        let canonical = self.cache.insert_if_absent(input, &board.id);
        debug!(input, canonical, "Resolved board id");
        Ok(canonical)
    }

    /// Check whether an operation on a board is permitted.
    ///
    /// With `normalize` set, the identifier is first resolved to canonical
    /// form; resolution failures propagate unchanged. An unrestricted policy
    /// permits unconditionally, without touching the API — under open access
    /// an unresolvable identifier passes this check and fails later, from
    /// the operation's own API call as a `TrelloError`, not as
    /// `BoardNotResolvable` here.
    pub async fn check_board_access(
        &self,
        board_id: &str,
        operation: &str,
        normalize: bool,
    ) -> GateResult<()> {
        if self.policy.is_unrestricted() {
            trace!(board = board_id, operation, "No allow-list configured, permitting");
            return Ok(());
        }

        let canonical = if normalize {
            self.resolve_canonical_board_id(board_id, operation).await?
        } else {
            board_id.to_string()
        };

        if self.policy.permits(&canonical) {
            debug!(board = %canonical, operation, "Board access permitted");
            Ok(())
        } else {
            Err(self.deny(&canonical, operation))
        }
    }

    /// Check whether an operation on a card is permitted.
    ///
    /// The owning board is fetched fresh on every call (cards move between
    /// boards) and must still pass normalization, since the API may report
    /// it in either form. `AccessDenied` from the delegated board check
    /// propagates unwrapped; only the card fetch itself maps to
    /// `EntityLookup`.
    pub async fn check_card_access(&self, card_id: &str, operation: &str) -> GateResult<()> {
        let card = self
            .lookup
            .card(card_id)
            .await
            .map_err(|source| GateError::EntityLookup {
                kind: EntityKind::Card,
                id: card_id.to_string(),
                operation: operation.to_string(),
                source,
            })?;

        let annotated = format!("{} (card {})", operation, card_id);
        self.check_board_access(&card.id_board, &annotated, true)
            .await
    }

    /// Check whether an operation on a list is permitted.
    ///
    /// Same shape as [`check_card_access`](Self::check_card_access), for the
    /// list entity kind.
    pub async fn check_list_access(&self, list_id: &str, operation: &str) -> GateResult<()> {
        let list = self
            .lookup
            .list(list_id)
            .await
            .map_err(|source| GateError::EntityLookup {
                kind: EntityKind::List,
                id: list_id.to_string(),
                operation: operation.to_string(),
                source,
            })?;

        let annotated = format!("{} (list {})", operation, list_id);
        self.check_board_access(&list.id_board, &annotated, true)
            .await
    }

    /// Build the denial, emitting the diagnostic record.
    ///
    /// Logging here is best-effort and never affects the decision.
    fn deny(&self, board: &str, operation: &str) -> GateError {
        let provenance = self.policy.provenance();
        warn!(
            board,
            operation,
            policy_key = %provenance.key,
            policy_path = ?provenance.path,
            allow_list = ?self.policy.boards_sorted(),
            "Board access denied"
        );
        GateError::AccessDenied(AccessDeniedError::new(
            board,
            operation,
            provenance.key.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyProvenance;
    use crate::error::TrelloError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory lookup fake with per-kind call counters.
    #[derive(Default)]
    struct FakeLookup {
        /// input id (short or canonical) -> canonical board id
        boards: HashMap<String, String>,
        /// card id -> owning board id
        cards: HashMap<String, String>,
        /// list id -> owning board id
        lists: HashMap<String, String>,
        board_calls: AtomicUsize,
        card_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl FakeLookup {
        fn with_board(mut self, input: &str, canonical: &str) -> Self {
            self.boards.insert(input.into(), canonical.into());
            self
        }

        fn with_card(mut self, id: &str, board: &str) -> Self {
            self.cards.insert(id.into(), board.into());
            self
        }

        fn with_list(mut self, id: &str, board: &str) -> Self {
            self.lists.insert(id.into(), board.into());
            self
        }
    }

    #[async_trait]
    impl BoardLookup for FakeLookup {
        async fn board(&self, id: &str) -> TrelloResult<Board> {
            self.board_calls.fetch_add(1, Ordering::SeqCst);
            let canonical = self.boards.get(id).ok_or_else(|| TrelloError::NotFound {
                resource: format!("board {}", id),
            })?;
            Ok(Board {
                id: canonical.clone(),
                name: "test board".into(),
                desc: None,
                closed: false,
                short_link: None,
                url: None,
                short_url: None,
            })
        }

        async fn card(&self, id: &str) -> TrelloResult<Card> {
            self.card_calls.fetch_add(1, Ordering::SeqCst);
            let board = self.cards.get(id).ok_or_else(|| TrelloError::NotFound {
                resource: format!("card {}", id),
            })?;
            Ok(Card {
                id: id.into(),
                name: "test card".into(),
                desc: String::new(),
                id_board: board.clone(),
                id_list: "L1".into(),
                closed: false,
                due: None,
                url: None,
                pos: None,
            })
        }

        async fn list(&self, id: &str) -> TrelloResult<TrelloList> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let board = self.lists.get(id).ok_or_else(|| TrelloError::NotFound {
                resource: format!("list {}", id),
            })?;
            Ok(TrelloList {
                id: id.into(),
                name: "test list".into(),
                id_board: board.clone(),
                closed: false,
                pos: None,
            })
        }
    }

    fn restricted(boards: &[&str]) -> BoardPolicy {
        BoardPolicy::restricted(boards.iter().copied(), PolicyProvenance::from_env())
    }

    #[tokio::test]
    async fn test_resolution_is_cached() {
        let lookup = Arc::new(FakeLookup::default().with_board("short1", "B1"));
        let gate = BoardAccessGate::new(lookup.clone(), BoardPolicy::open());

        let first = gate
            .resolve_canonical_board_id("short1", "get_board")
            .await
            .unwrap();
        let second = gate
            .resolve_canonical_board_id("short1", "get_board")
            .await
            .unwrap();

        assert_eq!(first, "B1");
        assert_eq!(second, "B1");
        // Second call must come from the cache
        assert_eq!(lookup.board_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_alias_and_canonical_resolve_to_same_board() {
        let lookup = Arc::new(
            FakeLookup::default()
                .with_board("short1", "B1")
                .with_board("B1", "B1"),
        );
        let gate = BoardAccessGate::new(lookup, BoardPolicy::open());

        let from_alias = gate
            .resolve_canonical_board_id("short1", "get_board")
            .await
            .unwrap();
        let from_canonical = gate
            .resolve_canonical_board_id("B1", "get_board")
            .await
            .unwrap();

        assert_eq!(from_alias, from_canonical);
    }

    #[tokio::test]
    async fn test_resolution_failure_is_not_cached() {
        let lookup = Arc::new(FakeLookup::default());
        let cache = Arc::new(InMemoryBoardIdCache::new());
        let gate =
            BoardAccessGate::with_cache(lookup.clone(), BoardPolicy::open(), cache.clone());

        let err = gate
            .resolve_canonical_board_id("bogus", "get_board")
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::BoardNotResolvable { .. }));
        assert!(cache.is_empty());

        // A retry reaches the API again
        let _ = gate.resolve_canonical_board_id("bogus", "get_board").await;
        assert_eq!(lookup.board_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_open_policy_permits_without_lookup() {
        let lookup = Arc::new(FakeLookup::default());
        let gate = BoardAccessGate::new(lookup.clone(), BoardPolicy::open());

        gate.check_board_access("anything", "update_board", true)
            .await
            .unwrap();
        assert_eq!(lookup.board_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allow_list_membership() {
        let lookup = Arc::new(
            FakeLookup::default()
                .with_board("B1", "B1")
                .with_board("B3", "B3"),
        );
        let gate = BoardAccessGate::new(lookup, restricted(&["B1", "B2"]));

        gate.check_board_access("B1", "get_board", true)
            .await
            .unwrap();

        let err = gate
            .check_board_access("B3", "get_board", true)
            .await
            .unwrap_err();
        match err {
            GateError::AccessDenied(denied) => {
                assert_eq!(denied.board, "B3");
                assert_eq!(denied.operation, "get_board");
                assert_eq!(denied.policy_key, "TRELLO_BOARD_IDS");
            }
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_link_permitted_via_normalization() {
        let lookup = Arc::new(FakeLookup::default().with_board("short1", "B1"));
        let gate = BoardAccessGate::new(lookup, restricted(&["B1"]));

        // Allow-list holds the canonical id; the short link still passes
        gate.check_board_access("short1", "get_board", true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_normalize_false_skips_resolution() {
        let lookup = Arc::new(FakeLookup::default());
        let gate = BoardAccessGate::new(lookup.clone(), restricted(&["B1"]));

        gate.check_board_access("B1", "get_board", false)
            .await
            .unwrap();
        assert_eq!(lookup.board_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_card_on_disallowed_board_is_denied() {
        let lookup = Arc::new(
            FakeLookup::default()
                .with_card("C1", "B3")
                .with_board("B3", "B3"),
        );
        let gate = BoardAccessGate::new(lookup, restricted(&["B1"]));

        let err = gate.check_card_access("C1", "get_card").await.unwrap_err();
        match err {
            GateError::AccessDenied(denied) => {
                assert_eq!(denied.board, "B3");
                // Operation label carries the entity context
                assert_eq!(denied.operation, "get_card (card C1)");
            }
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_card_is_lookup_failure_not_denial() {
        let lookup = Arc::new(FakeLookup::default());
        // Open policy would permit any board; the card fetch still fails
        let gate = BoardAccessGate::new(lookup, BoardPolicy::open());

        let err = gate
            .check_card_access("missing", "get_card")
            .await
            .unwrap_err();
        match err {
            GateError::EntityLookup { kind, id, .. } => {
                assert_eq!(kind, EntityKind::Card);
                assert_eq!(id, "missing");
            }
            other => panic!("expected EntityLookup, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_access_delegates_to_board() {
        let lookup = Arc::new(
            FakeLookup::default()
                .with_list("L2", "B3")
                .with_board("B3", "B3"),
        );
        let gate = BoardAccessGate::new(lookup, restricted(&["B1"]));

        let err = gate
            .check_list_access("L2", "move_card")
            .await
            .unwrap_err();
        match err {
            GateError::AccessDenied(denied) => {
                assert_eq!(denied.board, "B3");
                assert_eq!(denied.operation, "move_card (list L2)");
            }
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_owning_board_is_fetched_fresh_each_call() {
        let lookup = Arc::new(
            FakeLookup::default()
                .with_card("C1", "B1")
                .with_board("B1", "B1"),
        );
        let gate = BoardAccessGate::new(lookup.clone(), restricted(&["B1"]));

        gate.check_card_access("C1", "get_card").await.unwrap();
        gate.check_card_access("C1", "get_card").await.unwrap();

        // The card is re-fetched every time; only the board id resolution
        // is memoized
        assert_eq!(lookup.card_calls.load(Ordering::SeqCst), 2);
        assert_eq!(lookup.board_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_converges() {
        let lookup = Arc::new(FakeLookup::default().with_board("short1", "B1"));
        let cache = Arc::new(InMemoryBoardIdCache::new());
        let gate = Arc::new(BoardAccessGate::with_cache(
            lookup,
            BoardPolicy::open(),
            cache.clone(),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                gate.resolve_canonical_board_id("short1", "get_board").await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "B1");
        }
        // Racing writers converge to a single entry
        assert_eq!(cache.len(), 1);
    }
}
