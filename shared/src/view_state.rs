//! Client view state.
//!
//! UI state is a plain value. `reduce` is the only way to change it: it takes
//! the current state and an action and returns the next state plus the
//! fetches the caller should start. Every fetch carries a `RequestToken`;
//! when its response arrives, a token older than the latest one issued for
//! that resource is ignored, so a slow response for an old reporting window
//! can never overwrite a newer one.

use serde::{Deserialize, Serialize};

use crate::{Summary, SummaryPeriod, TransactionListRequest, TransactionListResponse, User};

/// Identifies one in-flight request for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

/// What happened when a response was handed to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Applied,
    Failed,
    Stale,
}

/// Remote data with its loading state
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully loaded value, kept across failed refreshes
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Nothing to show: no cached data and nothing in flight
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && !self.loading
    }

    /// Start a new request. Any token issued earlier becomes stale.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.loading = true;
        RequestToken(self.generation)
    }

    pub fn resolve(&mut self, token: RequestToken, result: Result<T, String>) -> ResolveOutcome {
        if token.0 != self.generation {
            return ResolveOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                ResolveOutcome::Applied
            }
            Err(message) => {
                self.error = Some(message);
                ResolveOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Error,
    Success,
}

/// Transient, dismissible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Whole-screen state of the expense tracker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub users: Resource<Vec<User>>,
    pub transactions: Resource<TransactionListResponse>,
    pub summary: Resource<Summary>,
    pub transaction_query: TransactionListRequest,
    pub window: SummaryPeriod,
    pub notification: Option<Notification>,
    next_notification_id: u64,
}

impl TrackerState {
    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.next_notification_id += 1;
        self.notification = Some(Notification {
            id: self.next_notification_id,
            kind,
            message,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RefreshUsers,
    UsersLoaded {
        token: RequestToken,
        result: Result<Vec<User>, String>,
    },
    RefreshTransactions,
    ChangeTransactionQuery(TransactionListRequest),
    TransactionsLoaded {
        token: RequestToken,
        result: Result<TransactionListResponse, String>,
    },
    RefreshSummary,
    SelectWindow(SummaryPeriod),
    SummaryLoaded {
        token: RequestToken,
        result: Result<Summary, String>,
    },
    /// A create/edit/delete finished on the server
    MutationSucceeded { message: String },
    MutationFailed { message: String },
    DismissNotification(u64),
}

/// A fetch the caller should perform and report back with the same token
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchUsers(RequestToken),
    FetchTransactions {
        token: RequestToken,
        request: TransactionListRequest,
    },
    FetchSummary {
        token: RequestToken,
        period: SummaryPeriod,
    },
}

fn fetch_transactions(state: &mut TrackerState) -> Effect {
    Effect::FetchTransactions {
        token: state.transactions.begin(),
        request: state.transaction_query.clone(),
    }
}

fn fetch_summary(state: &mut TrackerState) -> Effect {
    Effect::FetchSummary {
        token: state.summary.begin(),
        period: state.window.clone(),
    }
}

pub fn reduce(mut state: TrackerState, action: Action) -> (TrackerState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        Action::RefreshUsers => effects.push(Effect::FetchUsers(state.users.begin())),
        Action::UsersLoaded { token, result } => {
            if state.users.resolve(token, result) == ResolveOutcome::Failed {
                let message = format!(
                    "Failed to load users: {}",
                    state.users.error().unwrap_or_default()
                );
                state.notify(NotificationKind::Error, message);
            }
        }
        Action::RefreshTransactions => effects.push(fetch_transactions(&mut state)),
        Action::ChangeTransactionQuery(query) => {
            state.transaction_query = query;
            effects.push(fetch_transactions(&mut state));
        }
        Action::TransactionsLoaded { token, result } => {
            if state.transactions.resolve(token, result) == ResolveOutcome::Failed {
                let message = format!(
                    "Failed to load transactions: {}",
                    state.transactions.error().unwrap_or_default()
                );
                state.notify(NotificationKind::Error, message);
            }
        }
        Action::RefreshSummary => effects.push(fetch_summary(&mut state)),
        Action::SelectWindow(period) => {
            state.window = period;
            effects.push(fetch_summary(&mut state));
        }
        Action::SummaryLoaded { token, result } => {
            if state.summary.resolve(token, result) == ResolveOutcome::Failed {
                let message = format!(
                    "Failed to load summary: {}",
                    state.summary.error().unwrap_or_default()
                );
                state.notify(NotificationKind::Error, message);
            }
        }
        Action::MutationSucceeded { message } => {
            state.notify(NotificationKind::Success, message);
            effects.push(Effect::FetchUsers(state.users.begin()));
            effects.push(fetch_transactions(&mut state));
            effects.push(fetch_summary(&mut state));
        }
        Action::MutationFailed { message } => state.notify(NotificationKind::Error, message),
        Action::DismissNotification(id) => {
            if state.notification.as_ref().map(|n| n.id) == Some(id) {
                state.notification = None;
            }
        }
    }

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn summary_with_total(total: Decimal) -> Summary {
        Summary {
            total_expenses: total,
            transaction_count: 1,
            average_transaction: total,
            largest_transaction: total,
            active_users: 1,
            user_expenses: Default::default(),
            user_balances: Default::default(),
            daily_trends: vec![],
            users: vec![],
            period: SummaryPeriod::default(),
            settlements: vec![],
            settlement_efficiency: dec!(0),
        }
    }

    fn summary_token(effects: &[Effect]) -> RequestToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::FetchSummary { token, .. } => Some(*token),
                _ => None,
            })
            .unwrap()
    }

    fn window(start: &str, end: &str) -> SummaryPeriod {
        SummaryPeriod {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    #[test]
    fn test_resource_discards_stale_response() {
        let mut resource: Resource<u32> = Resource::new();
        let first = resource.begin();
        let second = resource.begin();

        assert_eq!(resource.resolve(second, Ok(2)), ResolveOutcome::Applied);
        assert_eq!(resource.resolve(first, Ok(1)), ResolveOutcome::Stale);
        assert_eq!(resource.data(), Some(&2));
        assert!(!resource.is_loading());
    }

    #[test]
    fn test_resource_keeps_last_known_good_on_failure() {
        let mut resource: Resource<u32> = Resource::new();
        let token = resource.begin();
        resource.resolve(token, Ok(7));

        let token = resource.begin();
        assert_eq!(resource.resolve(token, Err("offline".to_string())), ResolveOutcome::Failed);

        assert_eq!(resource.data(), Some(&7));
        assert_eq!(resource.error(), Some("offline"));
    }

    #[test]
    fn test_resource_empty_state_after_failure_without_cache() {
        let mut resource: Resource<u32> = Resource::new();
        assert!(resource.is_empty());

        let token = resource.begin();
        assert!(!resource.is_empty());
        resource.resolve(token, Err("boom".to_string()));

        assert!(resource.is_empty());
    }

    #[test]
    fn test_window_change_discards_late_summary_for_old_window() {
        let state = TrackerState::default();

        let (state, effects) = reduce(state, Action::SelectWindow(window("2025-01-01", "2025-01-31")));
        let january = summary_token(&effects);
        let (state, effects) = reduce(state, Action::SelectWindow(window("2025-02-01", "2025-02-28")));
        let february = summary_token(&effects);

        let (state, _) = reduce(
            state,
            Action::SummaryLoaded {
                token: february,
                result: Ok(summary_with_total(dec!(200))),
            },
        );
        let (state, _) = reduce(
            state,
            Action::SummaryLoaded {
                token: january,
                result: Ok(summary_with_total(dec!(100))),
            },
        );

        assert_eq!(state.summary.data().unwrap().total_expenses, dec!(200));
        assert_eq!(state.window, window("2025-02-01", "2025-02-28"));
    }

    #[test]
    fn test_failed_summary_raises_dismissible_notification() {
        let (state, effects) = reduce(TrackerState::default(), Action::RefreshSummary);
        let token = summary_token(&effects);
        let (state, _) = reduce(
            state,
            Action::SummaryLoaded {
                token,
                result: Ok(summary_with_total(dec!(50))),
            },
        );

        let (state, effects) = reduce(state, Action::RefreshSummary);
        let token = summary_token(&effects);
        let (state, _) = reduce(
            state,
            Action::SummaryLoaded {
                token,
                result: Err("server unavailable".to_string()),
            },
        );

        assert_eq!(state.summary.data().unwrap().total_expenses, dec!(50));
        let notification = state.notification.clone().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.contains("server unavailable"));

        let (state, _) = reduce(state, Action::DismissNotification(notification.id));
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_dismissing_old_notification_keeps_newer_one() {
        let (state, _) = reduce(
            TrackerState::default(),
            Action::MutationFailed {
                message: "first".to_string(),
            },
        );
        let old_id = state.notification.as_ref().unwrap().id;
        let (state, _) = reduce(
            state,
            Action::MutationFailed {
                message: "second".to_string(),
            },
        );

        let (state, _) = reduce(state, Action::DismissNotification(old_id));
        assert_eq!(state.notification.unwrap().message, "second");
    }

    #[test]
    fn test_mutation_success_refreshes_everything() {
        let (state, effects) = reduce(
            TrackerState::default(),
            Action::MutationSucceeded {
                message: "Transaction added".to_string(),
            },
        );

        assert_eq!(effects.len(), 3);
        assert!(matches!(effects[0], Effect::FetchUsers(_)));
        assert!(matches!(effects[1], Effect::FetchTransactions { .. }));
        assert!(matches!(effects[2], Effect::FetchSummary { .. }));
        assert!(state.transactions.is_loading());
        assert_eq!(state.notification.unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn test_transaction_query_change_carries_filter() {
        let query = TransactionListRequest {
            payer_id: Some("p".to_string()),
            ..Default::default()
        };

        let (state, effects) = reduce(TrackerState::default(), Action::ChangeTransactionQuery(query.clone()));

        assert_eq!(state.transaction_query, query);
        match &effects[0] {
            Effect::FetchTransactions { request, .. } => assert_eq!(request, &query),
            other => panic!("unexpected effect: {:?}", other),
        }
    }
}
