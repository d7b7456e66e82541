use std::time::Duration;

use gomoku_common::log;

use crate::broadcaster::RelayTransport;
use crate::messages::RelayMessage;
use crate::session_registry::SessionRegistry;

/// Periodically announces every joinable session to attached participants.
pub struct DiscoveryTask<T: RelayTransport> {
    registry: SessionRegistry<T>,
    interval: Duration,
}

impl<T: RelayTransport> DiscoveryTask<T> {
    pub fn new(registry: SessionRegistry<T>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.advertise_once().await;
        }
    }

    pub async fn advertise_once(&self) -> usize {
        let adverts = self.registry.advertisements().await;
        let count = adverts.len();
        for advert in adverts {
            self.registry
                .transport()
                .announce(RelayMessage::SessionAdvertised(advert))
                .await;
        }
        if count > 0 {
            log!("Advertised {} joinable session(s)", count);
        }
        count
    }
}
