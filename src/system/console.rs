//! Terminal display surface
//!
//! Renders the filtered history and the visible toasts, and forwards typed
//! commands to the tracker.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::clipboard::{ClipboardMonitor, SharedFocus};
use crate::core::features::ClipboardTracker;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::types::{ClipboardEntry, ToastRecord};

pub const HELP: &str = "Commands: <n> copy entry n | /search <text> | /clear | /pause | /help | /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Copy the n-th (1-based) entry of the current view
    Copy(usize),
    Search(String),
    Clear,
    TogglePause,
    Help,
    Quit,
    Unknown(String),
}

impl SurfaceCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Ok(n) = line.parse::<usize>() {
            return SurfaceCommand::Copy(n);
        }
        match line.split_once(' ') {
            Some(("/search", rest)) => SurfaceCommand::Search(rest.trim().to_string()),
            _ => match line {
                "/search" => SurfaceCommand::Search(String::new()),
                "/clear" => SurfaceCommand::Clear,
                "/pause" => SurfaceCommand::TogglePause,
                "/help" | "" => SurfaceCommand::Help,
                "/quit" | "/exit" => SurfaceCommand::Quit,
                other => SurfaceCommand::Unknown(other.to_string()),
            },
        }
    }
}

/// Render the history view as shown in the terminal
pub fn render_history(entries: &[ClipboardEntry], query: &str, copy_count: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── Clipboard History Pipe ── Total Copies: {}", copy_count);
    if !query.is_empty() {
        let _ = writeln!(out, "Search: {}", query);
    }
    if entries.is_empty() {
        let _ = writeln!(out, "  {}", ClipboardTracker::empty_message(query));
        return out;
    }
    for (i, entry) in entries.iter().enumerate() {
        let first_line = entry.content.lines().next().unwrap_or("");
        let _ = writeln!(out, "[{}] {}  {}", i + 1, first_line, entry.display_time());
        let mut meta = format!("From: {}", entry.source);
        if let Some(url) = &entry.url {
            let _ = write!(meta, " | {}", url);
        }
        if let Some(suggestion) = &entry.suggestion {
            let _ = write!(meta, " | Suggestion: {}", suggestion);
        }
        let _ = writeln!(out, "    {}", meta);
    }
    out
}

/// Render the open toasts, one per line
pub fn render_toasts(toasts: &[ToastRecord]) -> String {
    toasts
        .iter()
        .filter(|t| t.open)
        .map(|t| match &t.title {
            Some(title) => format!(">> {}: {}\n", title, t.description),
            None => format!(">> {}\n", t.description),
        })
        .collect()
}

pub struct ConsoleSurface {
    tracker: ClipboardTracker,
    monitor: Arc<ClipboardMonitor>,
    focus: SharedFocus,
    query: Arc<Mutex<String>>,
}

fn lock(query: &Mutex<String>) -> MutexGuard<'_, String> {
    match query.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl ConsoleSurface {
    pub fn new(tracker: ClipboardTracker, monitor: Arc<ClipboardMonitor>, focus: SharedFocus) -> Self {
        Self {
            tracker,
            monitor,
            focus,
            query: Arc::new(Mutex::new(String::new())),
        }
    }

    fn redraw(&self) {
        let query = lock(&self.query).clone();
        print!("{}", render_history(&self.tracker.filter(&query), &query, self.tracker.copy_count()));
    }

    /// Run until `/quit` or end of input
    pub async fn run(self) -> AppResult<()> {
        self.focus.set(true);

        let query = Arc::clone(&self.query);
        let mut history_sub = self.tracker.subscribe(move |event| {
            match event {
                AppEvent::HistoryUpdated { entries, copy_count } => {
                    let query = lock(&query).clone();
                    let view = crate::core::clipboard::filter_entries(entries, &query);
                    print!("{}", render_history(&view, &query, *copy_count));
                }
                AppEvent::MonitorToggled(enabled) => {
                    println!("Monitoring {}", if *enabled { "resumed" } else { "paused" });
                }
            }
        });
        let mut toast_sub = self.tracker.toasts().subscribe(|toasts| {
            print!("{}", render_toasts(toasts));
        });

        println!("{}", HELP);
        self.redraw();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if !self.handle(SurfaceCommand::parse(&line)).await {
                break;
            }
        }

        self.monitor.stop();
        history_sub.unsubscribe();
        toast_sub.unsubscribe();
        self.focus.set(false);
        Ok(())
    }

    /// Apply one command; returns false when the surface should close
    async fn handle(&self, command: SurfaceCommand) -> bool {
        match command {
            SurfaceCommand::Copy(n) => {
                let query = lock(&self.query).clone();
                let view = self.tracker.filter(&query);
                match n.checked_sub(1).and_then(|i| view.get(i)) {
                    // Failures are already reported as a toast
                    Some(entry) => { let _ = self.tracker.copy_back(&entry.content).await; }
                    None => println!("No entry {}", n),
                }
            }
            SurfaceCommand::Search(text) => {
                *lock(&self.query) = text;
                self.redraw();
            }
            SurfaceCommand::Clear => self.tracker.clear_history(),
            SurfaceCommand::TogglePause => { self.monitor.toggle(); }
            SurfaceCommand::Help => println!("{}", HELP),
            SurfaceCommand::Quit => return false,
            SurfaceCommand::Unknown(other) => println!("Unknown command: {}. {}", other, HELP),
        }
        true
    }
}
