//! Owner-scoped dashboard aggregation.
//!
//! Derived view only: recompute from the latest unfiltered fetch and the
//! current session whenever either changes. Never stored on its own.
//!
//! Ownership is filtered client-side from one bounded fetch
//! (`dashboard_limit` entries). Every book shown does belong to the current
//! identity, but owners whose books fall outside that window are
//! under-counted. This is a scalability ceiling, not a correctness bug.

use libris_types::{BookSummary, SessionState};
use tracing::warn;

/// Owned books shown on the dashboard before "view all".
pub const PREVIEW_LEN: usize = 6;

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerStats {
    pub total: usize,
    pub available: usize,
}

/// Books owned by the current identity plus counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnerSummary {
    pub owned: Vec<BookSummary>,
    pub stats: OwnerStats,
}

impl OwnerSummary {
    /// Filters `items` down to the current identity's books.
    ///
    /// Empty unless the session is authenticated.
    pub fn derive(items: &[BookSummary], session: &SessionState) -> Self {
        let Some(identity) = session.identity() else {
            return Self::default();
        };

        let owned: Vec<BookSummary> = items
            .iter()
            .filter(|book| book.owner_id() == Some(identity.id.as_str()))
            .cloned()
            .collect();
        let stats = OwnerStats {
            total: owned.len(),
            available: owned.iter().filter(|book| book.available).count(),
        };

        Self { owned, stats }
    }

    /// First few owned books.
    pub fn preview(&self) -> &[BookSummary] {
        &self.owned[..self.owned.len().min(PREVIEW_LEN)]
    }

    /// More owned books exist than the preview shows.
    pub fn has_more(&self) -> bool {
        self.owned.len() > PREVIEW_LEN
    }
}

/// True when a fetch of `limit` entries came back full, so owned books may
/// exist beyond it.
pub fn may_be_truncated(fetched: usize, limit: u32) -> bool {
    let truncated = fetched >= limit as usize;
    if truncated {
        warn!(
            fetched,
            limit, "dashboard fetch hit its limit; owned-book counts may be low"
        );
    }
    truncated
}

#[cfg(test)]
mod tests {
    use libris_types::{BookOwner, Identity, Role};

    use super::*;

    fn book(id: usize, owner: &str, available: bool) -> BookSummary {
        BookSummary {
            id: format!("b{id}"),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            cover_image: None,
            published_year: None,
            quantity: 1,
            available,
            owner: Some(BookOwner {
                id: owner.to_string(),
                name: None,
            }),
        }
    }

    fn signed_in(id: &str) -> SessionState {
        SessionState::Authenticated(Identity {
            id: id.to_string(),
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            role: Role::Member,
        })
    }

    fn catalog() -> Vec<BookSummary> {
        (0..10)
            .map(|i| {
                if i % 3 == 0 && i > 0 {
                    book(i, "me", i != 6)
                } else {
                    book(i, "someone-else", true)
                }
            })
            .collect()
    }

    #[test]
    fn test_counts_only_owned_books() {
        let summary = OwnerSummary::derive(&catalog(), &signed_in("me"));
        assert_eq!(summary.stats.total, 3);
        assert_eq!(summary.stats.available, 2);
        assert!(summary.owned.iter().all(|b| b.owner_id() == Some("me")));
    }

    #[test]
    fn test_empty_unless_authenticated() {
        for state in [SessionState::Unknown, SessionState::Anonymous] {
            let summary = OwnerSummary::derive(&catalog(), &state);
            assert!(summary.owned.is_empty());
            assert_eq!(summary.stats, OwnerStats::default());
        }
    }

    #[test]
    fn test_admin_sees_only_own_books() {
        let admin = SessionState::Authenticated(Identity {
            id: "root".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        });
        assert_eq!(OwnerSummary::derive(&catalog(), &admin).stats.total, 0);
    }

    #[test]
    fn test_preview_caps_at_six() {
        let items: Vec<BookSummary> = (0..8).map(|i| book(i, "me", true)).collect();
        let summary = OwnerSummary::derive(&items, &signed_in("me"));
        assert_eq!(summary.preview().len(), PREVIEW_LEN);
        assert!(summary.has_more());
    }

    #[test]
    fn test_truncation_detection() {
        assert!(may_be_truncated(100, 100));
        assert!(!may_be_truncated(42, 100));
    }
}
