use std::collections::VecDeque;

use crate::cache::CacheKey;
use crate::logging::forward_console_line;
use crate::persist::Bundle;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub enum Delta {
    Bundle { key: CacheKey, bundle: Bundle },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Stop,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub latest: Option<Bundle>,
    pub latest_key: Option<CacheKey>,
    pub pending_publish: bool,
    pub logs: VecDeque<String>,
    pub polls: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the line for display and mirrors it to tracing.
    pub fn push_log(&mut self, line: impl Into<String>) {
        let line = line.into();
        forward_console_line(&line);
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    /// The latest bundle, once per change.
    pub fn take_pending(&mut self) -> Option<&Bundle> {
        if !std::mem::take(&mut self.pending_publish) {
            return None;
        }
        self.latest.as_ref()
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Bundle { key, bundle } => {
            state.polls += 1;
            if let Some(current) = state.latest_key.as_ref() {
                let same_season = current.league == key.league && current.season == key.season;
                if same_season && key.day < current.day {
                    state.push_log(format!(
                        "[WARN] Ignoring stale snapshot for day {} (have day {})",
                        key.day + 1,
                        current.day + 1
                    ));
                    return;
                }
                let unchanged = current == &key
                    && state.latest.as_ref().is_some_and(|b| {
                        b.standings == bundle.standings && b.postseason == bundle.postseason
                    });
                if unchanged {
                    return;
                }
            }
            state.push_log(format!(
                "[INFO] {} season {} day {} projected",
                bundle.league,
                key.season + 1,
                key.day + 1
            ));
            state.latest_key = Some(key);
            state.latest = Some(bundle);
            state.pending_publish = true;
        }
        Delta::Log(line) => state.push_log(line),
    }
}
