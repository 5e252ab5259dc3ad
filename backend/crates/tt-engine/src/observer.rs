use crate::{Result as EngineResult, TimeEntrySnapshot, TimerCoordinator, TimerEvent};

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

/// A place in the UI that shows timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Navbar,
    /// Shows only the timers running on one ticket.
    TicketPage(Uuid),
    Mobile,
}

impl Surface {
    fn shows(&self, snapshot: &TimeEntrySnapshot) -> bool {
        match self {
            Self::Navbar | Self::Mobile => true,
            Self::TicketPage(ticket_id) => snapshot.ticket_id == *ticket_id,
        }
    }
}

/// One surface's subscription to a user's timers.
///
/// After an event arrives the next poll reads from storage; otherwise polls
/// are served by the coordinator's cache when it is fresh. Polls never fill
/// the cache.
pub struct SurfaceObserver {
    surface: Surface,
    user_id: Uuid,
    receiver: Receiver<TimerEvent>,
    coordinator: TimerCoordinator,
    last_event: Option<TimerEvent>,
}

impl SurfaceObserver {
    pub(crate) fn new(
        surface: Surface,
        user_id: Uuid,
        receiver: Receiver<TimerEvent>,
        coordinator: TimerCoordinator,
    ) -> Self {
        Self {
            surface,
            user_id,
            receiver,
            coordinator,
            last_event: None,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn last_event(&self) -> Option<&TimerEvent> {
        self.last_event.as_ref()
    }

    pub async fn poll(&mut self) -> EngineResult<Vec<TimeEntrySnapshot>> {
        let stale = self.drain_events();

        let snapshots = if stale {
            self.coordinator.fresh_timers(self.user_id).await?
        } else {
            self.coordinator.peek_timers(self.user_id).await?
        };

        Ok(snapshots
            .into_iter()
            .filter(|s| self.surface.shows(s))
            .collect())
    }

    pub async fn detach(self) {
        let Self {
            user_id,
            receiver,
            coordinator,
            ..
        } = self;
        coordinator.unsubscribe(user_id, receiver).await;
    }

    /// True when anything happened since the last poll.
    fn drain_events(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    stale = true;
                    self.last_event = Some(event);
                }
                Err(TryRecvError::Lagged(missed)) => {
                    log::debug!(
                        "{:?} surface for user {} missed {} events",
                        self.surface,
                        self.user_id,
                        missed
                    );
                    stale = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        stale
    }
}
