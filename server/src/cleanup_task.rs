use std::time::Duration;

use gomoku_common::log;

use crate::archive::SessionArchive;
use crate::broadcaster::RelayTransport;
use crate::session_registry::SessionRegistry;

pub struct CleanupTask<T: RelayTransport, A: SessionArchive> {
    registry: SessionRegistry<T>,
    archive: A,
    check_interval: Duration,
    inactivity_timeout: Duration,
}

impl<T: RelayTransport, A: SessionArchive> CleanupTask<T, A> {
    pub fn new(
        registry: SessionRegistry<T>,
        archive: A,
        check_interval: Duration,
        inactivity_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            archive,
            check_interval,
            inactivity_timeout,
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            interval.tick().await;
            self.cleanup_once().await;
        }
    }

    pub async fn cleanup_once(&self) {
        self.archive_finished().await;
        self.cleanup_inactive().await;
    }

    async fn archive_finished(&self) {
        for finished in self.registry.drain_finished().await {
            let session_id = finished.session_id.clone();
            if let Err(e) = self.archive.store(finished).await {
                log!("[session:{}] Failed to archive: {}", session_id, e);
            }
        }
    }

    async fn cleanup_inactive(&self) {
        let removed = self.registry.remove_inactive(self.inactivity_timeout).await;
        if !removed.is_empty() {
            log!("Cleaned up {} inactive session(s)", removed.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use gomoku_common::Participant;
    use gomoku_common::games::gomoku::{SearchConfig, SessionSettings, SessionStatus};

    use crate::archive::FinishedSession;
    use crate::broadcaster::Broadcaster;

    #[derive(Clone, Default)]
    struct MemoryArchive {
        stored: Arc<Mutex<Vec<FinishedSession>>>,
    }

    impl SessionArchive for MemoryArchive {
        async fn store(&self, finished: FinishedSession) -> Result<(), String> {
            self.stored.lock().await.push(finished);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_finished_sessions_are_archived_once() {
        let registry = SessionRegistry::new(Broadcaster::new(8), SearchConfig::default());
        let opened = registry
            .open_session(Participant::new("a", "A"), None, SessionSettings::new(6, 2))
            .await
            .unwrap();
        let session_id = opened.session_id;
        registry.join_session(&session_id, Participant::new("b", "B")).await.unwrap();

        // Open four in row 1 wins on the fourth stone.
        let script = [(1, 1), (4, 0), (1, 2), (4, 1), (1, 3), (4, 2), (1, 4)];
        for (i, (row, col)) in script.into_iter().enumerate() {
            let mover = if i % 2 == 0 { "a" } else { "b" };
            registry.submit_move(&session_id, &mover.into(), row, col).await.unwrap();
        }
        let snapshot = registry.snapshot(&session_id).await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Completed);

        let archive = MemoryArchive::default();
        let task = CleanupTask::new(registry.clone(), archive.clone(), Duration::from_secs(60), Duration::from_secs(3600));
        task.cleanup_once().await;
        task.cleanup_once().await;

        let stored = archive.stored.lock().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].winner.as_ref().map(|id| id.as_str()), Some("a"));
        assert_eq!(stored[0].move_log.len(), 7);
        assert!(stored[0].winning_line.is_some());
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_stale_waiting_sessions_are_dropped() {
        let registry = SessionRegistry::new(Broadcaster::new(8), SearchConfig::default());
        registry
            .open_session(Participant::new("a", "A"), None, SessionSettings::new(9, 2))
            .await
            .unwrap();

        let task = CleanupTask::new(registry.clone(), MemoryArchive::default(), Duration::from_secs(60), Duration::ZERO);
        task.cleanup_once().await;
        assert_eq!(registry.session_count().await, 0);
    }
}
