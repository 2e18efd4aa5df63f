pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;

pub mod contest {
    pub mod repository;
    pub mod usecase;

    pub use repository::{ContestRepository, InMemoryContestRepository};
    pub use usecase::{ContestJoinControl, JoinOutcome};
}

pub mod leaderboard {
    pub mod repository;
    pub mod usecase;

    pub use repository::{InMemoryParticipationRepository, ParticipationRepository};
    pub use usecase::LeaderboardService;
}

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, GateError};
pub use notify::{LogNotifier, Notice, NoticeQueue, Notifier, Severity};
pub use session::{Role, SessionContext};
