//! Idle-session logout.

use admin_framework::SessionManager;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Logs the session out once it has been idle for `idle_timeout`.
///
/// Activity is whatever the caller reports through [`touch`](Self::touch).
/// The idle clock also restarts whenever the session becomes
/// authenticated, so a fresh login is never logged out by stale activity.
pub struct SessionWatchdog {
    last_activity: Arc<Mutex<Instant>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionWatchdog {
    pub fn spawn<U>(
        session: Arc<SessionManager<U>>,
        idle_timeout: Duration,
        check_every: Duration,
    ) -> Self
    where
        U: Clone + Debug + Send + Sync + 'static,
    {
        let last_activity = Arc::new(Mutex::new(Instant::now()));
        let activity = last_activity.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(check_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut was_authenticated = false;

            loop {
                ticker.tick().await;
                let authenticated = session.is_authenticated();
                if authenticated && !was_authenticated {
                    *activity.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
                }
                was_authenticated = authenticated;
                if !authenticated {
                    continue;
                }

                let idle = activity.lock().unwrap_or_else(|e| e.into_inner()).elapsed();
                if idle >= idle_timeout {
                    info!(idle_secs = idle.as_secs(), "Session idle, logging out");
                    session.logout().await;
                    was_authenticated = false;
                }
            }
        });

        debug!(?idle_timeout, ?check_every, "Session watchdog started");
        Self {
            last_activity,
            handle: Some(handle),
        }
    }

    /// Records user activity.
    pub fn touch(&self) {
        *self.last_activity.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }

    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        debug!("Session watchdog stopped");
    }
}

impl Drop for SessionWatchdog {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
