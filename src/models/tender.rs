use serde::{Deserialize, Serialize};

pub const STATUSES: &[&str] = &["open", "in_progress", "closed"];

/// Position in the open → in_progress → closed lifecycle.
pub fn status_rank(status: &str) -> Option<usize> {
    STATUSES.iter().position(|s| *s == status)
}

/// A tender only moves forward through the lifecycle, never back and never
/// to the status it already has.
pub fn can_transition(current: &str, next: &str) -> bool {
    match (status_rank(current), status_rank(next)) {
        (Some(current), Some(next)) => next > current,
        _ => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tender {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: Option<i64>,
    pub city: Option<String>,
    pub deadline: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rank_orders_the_lifecycle() {
        assert!(status_rank("open") < status_rank("in_progress"));
        assert!(status_rank("in_progress") < status_rank("closed"));
        assert_eq!(status_rank("cancelled"), None);
    }

    #[test]
    fn only_forward_transitions_are_allowed() {
        assert!(can_transition("open", "in_progress"));
        assert!(can_transition("open", "closed"));
        assert!(can_transition("in_progress", "closed"));

        assert!(!can_transition("closed", "open"));
        assert!(!can_transition("closed", "in_progress"));
        assert!(!can_transition("in_progress", "open"));
        assert!(!can_transition("open", "open"));
        assert!(!can_transition("open", "cancelled"));
        assert!(!can_transition("cancelled", "closed"));
    }
}
