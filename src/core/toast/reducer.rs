use serde::{Deserialize, Serialize};

use crate::shared::types::{ToastPatch, ToastRecord};

/// Visible toasts, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastState {
    pub toasts: Vec<ToastRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastAction {
    Add(ToastRecord),
    Update { id: String, patch: ToastPatch },
    /// Close one toast, or every toast when `None`
    Dismiss(Option<String>),
    /// Delete one toast, or every toast when `None`
    Remove(Option<String>),
}

/// Apply `action` to `state`. Unknown ids leave the state untouched.
pub fn reduce(state: &ToastState, action: &ToastAction, limit: usize) -> ToastState {
    match action {
        ToastAction::Add(toast) => {
            let mut toasts = Vec::with_capacity(state.toasts.len() + 1);
            toasts.push(toast.clone());
            toasts.extend(state.toasts.iter().cloned());
            toasts.truncate(limit.max(1));
            ToastState { toasts }
        }
        ToastAction::Update { id, patch } => ToastState {
            toasts: state
                .toasts
                .iter()
                .map(|t| {
                    let mut t = t.clone();
                    if &t.id == id {
                        t.apply(patch);
                    }
                    t
                })
                .collect(),
        },
        ToastAction::Dismiss(target) => ToastState {
            toasts: state
                .toasts
                .iter()
                .map(|t| {
                    let mut t = t.clone();
                    if target.as_ref().map_or(true, |id| *id == t.id) {
                        t.open = false;
                    }
                    t
                })
                .collect(),
        },
        ToastAction::Remove(Some(id)) => ToastState {
            toasts: state.toasts.iter().filter(|t| &t.id != id).cloned().collect(),
        },
        ToastAction::Remove(None) => ToastState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(descriptions: &[&str]) -> ToastState {
        ToastState {
            toasts: descriptions.iter().map(|d| ToastRecord::new(*d)).collect(),
        }
    }

    #[test]
    fn test_add_puts_newest_first_and_respects_limit() {
        let state = ToastState::default();
        let first = ToastRecord::new("first");
        let second = ToastRecord::new("second");

        let state = reduce(&state, &ToastAction::Add(first), 1);
        let state = reduce(&state, &ToastAction::Add(second.clone()), 1);

        assert_eq!(state.toasts, vec![second]);
    }

    #[test]
    fn test_add_with_larger_limit_keeps_newest() {
        let mut state = ToastState::default();
        for d in ["a", "b", "c", "d"] {
            state = reduce(&state, &ToastAction::Add(ToastRecord::new(d)), 3);
        }
        let descriptions: Vec<&str> = state.toasts.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_dismiss_single_and_all() {
        let state = state_with(&["a", "b"]);
        let target = state.toasts[1].id.clone();

        let one = reduce(&state, &ToastAction::Dismiss(Some(target)), 5);
        assert!(one.toasts[0].open);
        assert!(!one.toasts[1].open);

        let all = reduce(&state, &ToastAction::Dismiss(None), 5);
        assert!(all.toasts.iter().all(|t| !t.open));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let state = state_with(&["a"]);
        let missing = "does-not-exist".to_string();

        assert_eq!(reduce(&state, &ToastAction::Dismiss(Some(missing.clone())), 1), state);
        assert_eq!(reduce(&state, &ToastAction::Remove(Some(missing.clone())), 1), state);
        assert_eq!(
            reduce(&state, &ToastAction::Update { id: missing, patch: ToastPatch::description("x") }, 1),
            state
        );
    }

    #[test]
    fn test_update_merges_patch() {
        let state = state_with(&["a"]);
        let id = state.toasts[0].id.clone();
        let next = reduce(&state, &ToastAction::Update { id, patch: ToastPatch::description("b") }, 1);
        assert_eq!(next.toasts[0].description, "b");
        assert!(next.toasts[0].open);
    }

    #[test]
    fn test_remove_single_and_all() {
        let state = state_with(&["a", "b"]);
        let id = state.toasts[0].id.clone();

        let one = reduce(&state, &ToastAction::Remove(Some(id)), 5);
        assert_eq!(one.toasts.len(), 1);
        assert_eq!(one.toasts[0].description, "b");

        assert!(reduce(&state, &ToastAction::Remove(None), 5).toasts.is_empty());
    }
}
