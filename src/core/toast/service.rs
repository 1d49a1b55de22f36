use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::reducer::{reduce, ToastAction, ToastState};
use crate::core::observer::{ObserverRegistry, Subscription};
use crate::shared::settings::ToastSettings;
use crate::shared::types::{ToastPatch, ToastRecord};

fn lock<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("[ToastService] Mutex poisoned in {}(), recovering...", context);
            poisoned.into_inner()
        }
    }
}

struct ServiceInner {
    settings: ToastSettings,
    state: Mutex<ToastState>,
    /// Pending removal per dismissed toast id
    remove_timers: Mutex<HashMap<String, JoinHandle<()>>>,
    /// Pending automatic dismissal per open toast id
    dismiss_timers: Mutex<HashMap<String, JoinHandle<()>>>,
    listeners: ObserverRegistry<Vec<ToastRecord>>,
}

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    Remove,
    Dismiss,
}

impl ServiceInner {
    fn timers(&self, kind: TimerKind) -> &Mutex<HashMap<String, JoinHandle<()>>> {
        match kind {
            TimerKind::Remove => &self.remove_timers,
            TimerKind::Dismiss => &self.dismiss_timers,
        }
    }
}

impl Drop for ServiceInner {
    fn drop(&mut self) {
        for timers in [&self.remove_timers, &self.dismiss_timers] {
            for (_, handle) in lock(timers, "drop").drain() {
                handle.abort();
            }
        }
    }
}

/// Application-wide toast queue.
///
/// Construct once at startup and hand clones to whoever needs to raise or
/// display toasts; clones share the same queue. Timers run on the ambient
/// tokio runtime.
#[derive(Clone)]
pub struct ToastService {
    inner: Arc<ServiceInner>,
}

/// Returned by [`ToastService::request`], bound to one toast id
#[derive(Clone)]
pub struct ToastHandle {
    pub id: String,
    service: ToastService,
}

impl ToastHandle {
    pub fn dismiss(&self) {
        self.service.dismiss(Some(&self.id));
    }

    pub fn update(&self, patch: ToastPatch) {
        self.service.update(&self.id, patch);
    }
}

impl ToastService {
    pub fn new(settings: ToastSettings) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                settings,
                state: Mutex::new(ToastState::default()),
                remove_timers: Mutex::new(HashMap::new()),
                dismiss_timers: Mutex::new(HashMap::new()),
                listeners: ObserverRegistry::new(),
            }),
        }
    }

    /// Show a toast with `description`
    pub fn request(&self, description: impl Into<String>) -> ToastHandle {
        self.push(ToastRecord::new(description))
    }

    pub fn request_with_title(&self, title: impl Into<String>, description: impl Into<String>) -> ToastHandle {
        let mut toast = ToastRecord::new(description);
        toast.title = Some(title.into());
        self.push(toast)
    }

    fn push(&self, toast: ToastRecord) -> ToastHandle {
        let id = toast.id.clone();
        log::debug!("[ToastService] Adding toast {}", id);
        self.dispatch(ToastAction::Add(toast));

        if let Some(delay) = self.inner.settings.auto_dismiss() {
            self.schedule_dismiss(&id, delay);
        }

        ToastHandle { id, service: self.clone() }
    }

    /// Close one toast, or all of them when `id` is `None`, and schedule removal.
    /// Unknown ids are ignored.
    pub fn dismiss(&self, id: Option<&str>) {
        let targets: Vec<String> = {
            let state = lock(&self.inner.state, "dismiss");
            state
                .toasts
                .iter()
                .filter(|t| id.map_or(true, |id| t.id == id))
                .map(|t| t.id.clone())
                .collect()
        };
        if targets.is_empty() {
            return;
        }

        for target in &targets {
            if let Some(handle) = lock(&self.inner.dismiss_timers, "dismiss").remove(target) {
                handle.abort();
            }
            self.schedule_remove(target);
        }
        self.dispatch(ToastAction::Dismiss(id.map(str::to_string)));
    }

    /// Merge `patch` into the toast with `id`
    pub fn update(&self, id: &str, patch: ToastPatch) {
        if patch.open == Some(false) {
            self.dismiss(Some(id));
            let rest = ToastPatch { open: None, ..patch };
            if rest != ToastPatch::default() {
                self.dispatch(ToastAction::Update { id: id.to_string(), patch: rest });
            }
            return;
        }
        self.dispatch(ToastAction::Update { id: id.to_string(), patch });
    }

    /// Open-state change reported by a display surface; closing means dismiss
    pub fn set_open(&self, id: &str, open: bool) {
        self.update(id, ToastPatch { open: Some(open), ..ToastPatch::default() });
    }

    /// Current toasts, newest first
    pub fn toasts(&self) -> Vec<ToastRecord> {
        lock(&self.inner.state, "toasts").toasts.clone()
    }

    /// Call `listener` with the full toast list after every change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ToastRecord]) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(move |toasts: &Vec<ToastRecord>| listener(toasts))
    }

    pub fn pending_removals(&self) -> usize {
        lock(&self.inner.remove_timers, "pending_removals").len()
    }

    /// Cancel all pending timers. Visible toasts are left as they are.
    pub fn shutdown(&self) {
        for timers in [&self.inner.remove_timers, &self.inner.dismiss_timers] {
            for (_, handle) in lock(timers, "shutdown").drain() {
                handle.abort();
            }
        }
    }

    fn dispatch(&self, action: ToastAction) {
        let (before, after) = {
            let mut state = lock(&self.inner.state, "dispatch");
            let next = reduce(&state, &action, self.inner.settings.limit);
            let before = std::mem::replace(&mut *state, next);
            (before, state.clone())
        };
        if before == after {
            return;
        }

        if let ToastAction::Add(_) = action {
            for evicted in before.toasts.iter().filter(|t| !after.toasts.iter().any(|a| a.id == t.id)) {
                self.cancel_timers(&evicted.id);
            }
        }

        self.inner.listeners.notify(&after.toasts);
    }

    fn cancel_timers(&self, id: &str) {
        for timers in [&self.inner.remove_timers, &self.inner.dismiss_timers] {
            if let Some(handle) = lock(timers, "cancel_timers").remove(id) {
                handle.abort();
            }
        }
    }

    fn remove(&self, id: &str) {
        log::debug!("[ToastService] Removing toast {}", id);
        self.dispatch(ToastAction::Remove(Some(id.to_string())));
    }

    fn schedule_remove(&self, id: &str) {
        let delay = self.inner.settings.remove_delay();
        self.schedule(TimerKind::Remove, id, delay);
    }

    fn schedule_dismiss(&self, id: &str, delay: Duration) {
        self.schedule(TimerKind::Dismiss, id, delay);
    }

    /// Start a `kind` timer for `id` unless one is already pending
    fn schedule(&self, kind: TimerKind, id: &str, delay: Duration) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!("[ToastService] No async runtime, toast {} will not be timed", id);
                return;
            }
        };

        let mut pending = lock(self.inner.timers(kind), "schedule");
        if pending.contains_key(id) {
            return;
        }

        let weak: Weak<ServiceInner> = Arc::downgrade(&self.inner);
        let owned_id = id.to_string();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            lock(inner.timers(kind), "timer").remove(&owned_id);

            let service = ToastService { inner };
            match kind {
                TimerKind::Remove => service.remove(&owned_id),
                TimerKind::Dismiss => service.dismiss(Some(&owned_id)),
            }
        });
        pending.insert(id.to_string(), handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn settings(limit: usize, auto_dismiss_ms: Option<u64>) -> ToastSettings {
        ToastSettings { limit, remove_delay_ms: 3000, auto_dismiss_ms }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_requests_with_limit_one_keep_latest() {
        let service = ToastService::new(settings(1, None));
        service.request("first");
        let second = service.request("second");

        let toasts = service.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, second.id);
        assert_eq!(toasts[0].description, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_then_removed_after_delay() {
        let service = ToastService::new(settings(1, None));
        let handle = service.request("hello");

        handle.dismiss();
        assert!(!service.toasts()[0].open);
        assert_eq!(service.pending_removals(), 1);

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(service.toasts().len(), 1);

        sleep(Duration::from_millis(2)).await;
        assert!(service.toasts().is_empty());
        assert_eq!(service.pending_removals(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_dismiss_keeps_single_timer_and_removes_once() {
        let service = ToastService::new(settings(1, None));
        let handle = service.request("hello");

        let removals = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&removals);
        let _sub = service.subscribe(move |toasts| {
            if toasts.is_empty() {
                r.fetch_add(1, Ordering::SeqCst);
            }
        });

        handle.dismiss();
        sleep(Duration::from_millis(1000)).await;
        handle.dismiss();
        service.dismiss(None);
        assert_eq!(service.pending_removals(), 1);

        // Removal is measured from the first dismissal
        sleep(Duration::from_millis(2001)).await;
        assert!(service.toasts().is_empty());

        sleep(Duration::from_millis(5000)).await;
        assert_eq!(removals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_all_schedules_one_removal_per_toast() {
        let service = ToastService::new(settings(3, None));
        service.request("one");
        service.request("two");
        service.request("three");

        service.dismiss(None);
        assert!(service.toasts().iter().all(|t| !t.open));
        assert_eq!(service.pending_removals(), 3);

        sleep(Duration::from_millis(1000)).await;
        service.dismiss(None);
        assert_eq!(service.pending_removals(), 3);

        sleep(Duration::from_millis(1999)).await;
        assert_eq!(service.toasts().len(), 3);

        sleep(Duration::from_millis(2)).await;
        assert!(service.toasts().is_empty());
        assert_eq!(service.pending_removals(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_unknown_id_is_silent() {
        let service = ToastService::new(settings(1, None));
        service.request("hello");

        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let _sub = service.subscribe(move |_| { c.fetch_add(1, Ordering::SeqCst); });

        service.dismiss(Some("nope"));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.pending_removals(), 0);
        assert!(service.toasts()[0].open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_then_remove() {
        let service = ToastService::new(settings(1, Some(5000)));
        service.request("hello");

        sleep(Duration::from_millis(5001)).await;
        let toasts = service.toasts();
        assert_eq!(toasts.len(), 1);
        assert!(!toasts[0].open);

        sleep(Duration::from_millis(3000)).await;
        assert!(service.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicted_toast_timers_are_cancelled() {
        let service = ToastService::new(settings(1, None));
        let first = service.request("first");
        first.dismiss();
        assert_eq!(service.pending_removals(), 1);

        service.request("second");
        assert_eq!(service.pending_removals(), 0);

        sleep(Duration::from_millis(4000)).await;
        assert_eq!(service.toasts()[0].description, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_and_set_open() {
        let service = ToastService::new(settings(2, None));
        let handle = service.request_with_title("Clipboard", "copying");

        handle.update(ToastPatch::description("copied"));
        let toast = &service.toasts()[0];
        assert_eq!(toast.description, "copied");
        assert_eq!(toast.title.as_deref(), Some("Clipboard"));

        service.set_open(&handle.id, false);
        assert!(!service.toasts()[0].open);
        assert_eq!(service.pending_removals(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_each_change_until_unsubscribed() {
        let service = ToastService::new(settings(1, None));
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let mut sub = service.subscribe(move |toasts| s.lock().unwrap().push(toasts.len()));

        let handle = service.request("a");
        handle.dismiss();
        sub.unsubscribe();
        sleep(Duration::from_millis(3001)).await;

        assert!(service.toasts().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_without_runtime_toasts_still_queue() {
        let service = ToastService::new(settings(1, Some(10)));
        service.request("no runtime");
        service.dismiss(None);
        assert_eq!(service.toasts().len(), 1);
        assert_eq!(service.pending_removals(), 0);
    }
}
