// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blocking wait for task instances to finish.
//!
//! The poll is fixed-interval: fetch, and while the state is not terminal
//! sleep for the refresh period and fetch again. With no timeout and no
//! cancel flag it waits forever.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{Result, SdkError};
use crate::models::{TaskInstance, TaskKind};
use crate::resource::ResourceManager;

/// Default time between two fetches.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(5);

/// Longest stretch slept without looking at the cancel flag.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Shared flag that stops a wait from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for [`ResourceManager::wait_until_finished`].
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Time between two fetches.
    pub refresh_period: Duration,
    /// Give up with `SdkError::Timeout` once this much time has passed.
    pub timeout: Option<Duration>,
    /// Give up with `SdkError::Cancelled` once this flag is set.
    pub cancel: Option<CancelFlag>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            refresh_period: DEFAULT_REFRESH_PERIOD,
            timeout: None,
            cancel: None,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refresh_period(mut self, period: Duration) -> Self {
        self.refresh_period = period;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }

    /// Sleep one refresh period, waking early only for cancellation.
    ///
    /// A period too long to add to the current instant has no wake time;
    /// only cancellation ends it.
    fn pause(&self) {
        if self.cancel.is_none() {
            std::thread::sleep(self.refresh_period);
            return;
        }

        let wake_at = Instant::now().checked_add(self.refresh_period);
        loop {
            if self.is_cancelled() {
                return;
            }
            let chunk = match wake_at {
                Some(wake_at) => {
                    let now = Instant::now();
                    if now >= wake_at {
                        return;
                    }
                    (wake_at - now).min(CANCEL_CHECK_INTERVAL)
                }
                None => CANCEL_CHECK_INTERVAL,
            };
            std::thread::sleep(chunk);
        }
    }

    /// Whether sleeping another period would carry the wait past its
    /// timeout. An elapsed time plus period that overflows always does.
    fn next_poll_overshoots(&self, elapsed: Duration) -> bool {
        match self.timeout {
            Some(timeout) => elapsed
                .checked_add(self.refresh_period)
                .is_none_or(|next_poll| next_poll > timeout),
            None => false,
        }
    }
}

impl<K: TaskKind> ResourceManager<'_, TaskInstance<K>> {
    /// Block until the instance reaches successful, failed or terminated,
    /// and return it as first observed in that state.
    ///
    /// Fetches are spaced by at least `options.refresh_period`. When the
    /// next fetch would land past `options.timeout`, returns
    /// `SdkError::Timeout` without sleeping.
    #[instrument(skip(self, options), fields(kind = K::NAME, refresh_ms = options.refresh_period.as_millis() as u64))]
    pub fn wait_until_finished(&self, uuid: Uuid, options: &WaitOptions) -> Result<TaskInstance<K>> {
        let started = Instant::now();

        loop {
            let instance = self.get(uuid)?;
            if instance.state.is_terminal() {
                info!(state = %instance.state, elapsed_ms = started.elapsed().as_millis() as u64, "Task instance finished");
                return Ok(instance);
            }
            debug!(state = %instance.state, "Task instance not finished yet");

            if let Some(timeout) = options.timeout {
                if options.next_poll_overshoots(started.elapsed()) {
                    return Err(SdkError::Timeout(timeout.as_millis() as u64));
                }
            }
            if options.is_cancelled() {
                return Err(SdkError::Cancelled(uuid.to_string()));
            }

            options.pause();

            if options.is_cancelled() {
                return Err(SdkError::Cancelled(uuid.to_string()));
            }
        }
    }
}
