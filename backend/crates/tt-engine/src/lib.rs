pub mod clock;
pub mod coordinator;
pub mod error;
pub mod event_bus;
pub mod events;
pub mod lifecycle;
pub mod observer;
pub mod options;
pub mod outcome;
pub mod pricing;
pub mod retry;
pub mod settings;
pub mod snapshot;
pub mod ticket_gateway;
pub mod timer_store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::TimerCoordinator;
pub use error::{EngineError, Result};
pub use event_bus::TimerEventBus;
pub use events::{TimerEvent, TimerEventKind};
pub use lifecycle::TimerService;
pub use observer::{Surface, SurfaceObserver};
pub use options::{
    BatchStopSettings, ConflictResolution, EntryCorrection, ManualEntry, StartOptions,
    StopSettings,
};
pub use outcome::{ConflictInfo, StartOutcome, StopIntent};
pub use pricing::Pricing;
pub use retry::{IsRetryable, RetryConfig, with_retry};
pub use settings::EngineSettings;
pub use snapshot::TimeEntrySnapshot;
pub use ticket_gateway::{SqliteTicketGateway, TicketGateway};
pub use timer_store::{StopRequest, TimerStore};
pub use validation::TimerValidator;
