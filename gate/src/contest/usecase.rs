use crate::clock::Clock;
use crate::config::GateConfig;
use crate::contest::repository::ContestRepository;
use crate::error::GateError;
use crate::notify::{Notice, Notifier};
use crate::session::SessionContext;
use log::{debug, error, info, warn};
use shared::{Contest, ContestAction, ContestPhase, ContestStatusDto, SharedError};

/// What a successful activation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The join mutation went through
    Joined,
    /// A reminder confirmation was shown; nothing was persisted
    ReminderNoted,
    /// The control was disabled
    Ignored,
}

type JoinedCallback = Box<dyn FnMut(&Contest) + Send>;

/// Holds the busy flag up until dropped, so a join future that is dropped
/// mid-await still leaves the control re-enterable.
struct BusyFlag<'a> {
    flag: &'a mut bool,
}

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// The join control for one contest and one signed-in user.
///
/// Holds a local snapshot of the contest plus the two UI flags: `has_joined`,
/// seeded from the participant list, and `is_loading`, set while the join
/// mutation is outstanding.
pub struct ContestJoinControl<R, N, C> {
    session: SessionContext,
    contest: Contest,
    repo: R,
    notifier: N,
    clock: C,
    config: GateConfig,
    has_joined: bool,
    is_loading: bool,
    on_joined: Option<JoinedCallback>,
}

impl<R, N, C> ContestJoinControl<R, N, C>
where
    R: ContestRepository,
    N: Notifier,
    C: Clock,
{
    pub fn new(
        session: SessionContext,
        contest: Contest,
        repo: R,
        notifier: N,
        clock: C,
        config: GateConfig,
    ) -> Self {
        let has_joined = contest.has_participant(&session.user_id);
        debug!(
            "Join control for contest {} as {} ({:?}), joined={}",
            contest.id, session.user_id, session.role, has_joined
        );
        Self {
            session,
            contest,
            repo,
            notifier,
            clock,
            config,
            has_joined,
            is_loading: false,
            on_joined: None,
        }
    }

    /// Called once after a successful join with the updated contest.
    pub fn with_on_joined<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Contest) + Send + 'static,
    {
        self.on_joined = Some(Box::new(callback));
        self
    }

    pub fn contest(&self) -> &Contest {
        &self.contest
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn has_joined(&self) -> bool {
        self.has_joined
    }

    /// True only while the join mutation is outstanding. `activate` holds
    /// `&mut self` for that whole time, so outside callers see this only if
    /// the flag is later shared with a separate renderer.
    pub fn is_busy(&self) -> bool {
        self.is_loading
    }

    pub fn phase(&self) -> ContestPhase {
        self.contest.phase_at(self.clock.now())
    }

    /// The single affordance to present right now. `Disabled` only shows up
    /// while a join is in flight; see `is_busy`.
    pub fn action(&self) -> ContestAction {
        match self.phase() {
            ContestPhase::Ended => ContestAction::Ended,
            _ if self.has_joined => ContestAction::Joined,
            _ if self.is_loading => ContestAction::Disabled,
            ContestPhase::Active => ContestAction::Join,
            ContestPhase::Upcoming => ContestAction::Remind,
        }
    }

    pub fn status(&self) -> ContestStatusDto {
        let action = self.action();
        ContestStatusDto {
            contest_id: self.contest.id.clone(),
            phase: self.phase(),
            action,
            label: action.label().to_string(),
            enabled: action.is_enabled(),
            participant_count: self.contest.participants.len(),
            remaining_slots: self.contest.remaining_slots(),
            has_joined: self.has_joined,
            is_busy: self.is_loading,
        }
    }

    /// Re-reads the contest from the store. The joined flag never goes back
    /// to false.
    pub async fn refresh(&mut self) -> shared::Result<()> {
        let contest = self
            .repo
            .find_by_id(&self.contest.id)
            .await
            .ok_or_else(|| SharedError::NotFound(format!("Contest {} not found", self.contest.id)))?;
        self.has_joined = self.has_joined || contest.has_participant(&self.session.user_id);
        self.contest = contest;
        Ok(())
    }

    /// Acts on whatever `action()` currently selects.
    pub async fn activate(&mut self) -> Result<JoinOutcome, GateError> {
        match self.action() {
            ContestAction::Ended => Err(self.reject(GateError::ContestEnded)),
            ContestAction::Joined => Err(self.reject(GateError::AlreadyJoined)),
            ContestAction::Join => self.join().await,
            ContestAction::Remind => {
                self.set_reminder();
                Ok(JoinOutcome::ReminderNoted)
            }
            ContestAction::Disabled => {
                debug!("Join control for {} is disabled; ignoring", self.contest.id);
                Ok(JoinOutcome::Ignored)
            }
        }
    }

    async fn join(&mut self) -> Result<JoinOutcome, GateError> {
        // The phase may have moved on since action() was read
        if !self.contest.is_active_at(self.clock.now()) {
            return Err(self.reject(GateError::InactiveContest));
        }
        if self.contest.has_participant(&self.session.user_id) {
            return Err(self.reject(GateError::AlreadyJoined));
        }
        if self.contest.is_full() {
            return Err(self.reject(GateError::ContestFull));
        }

        let busy = BusyFlag::raise(&mut self.is_loading);
        let result = self
            .repo
            .join_contest(&self.contest.id, &self.session.user_id)
            .await;
        drop(busy);

        match result {
            Ok(()) => {
                self.contest.participants.push(self.session.user_id.clone());
                self.has_joined = true;
                info!("User {} joined contest {}", self.session.user_id, self.contest.id);
                self.notifier.notify(Notice::success(
                    "Success",
                    "You have successfully joined the contest!",
                ));
                if let Some(callback) = self.on_joined.as_mut() {
                    callback(&self.contest);
                }
                Ok(JoinOutcome::Joined)
            }
            Err(e) => {
                let message = if e.message().trim().is_empty() {
                    self.config.join_failure_fallback.clone()
                } else {
                    e.message().to_string()
                };
                error!(
                    "Join mutation failed for user {} on contest {}: {}",
                    self.session.user_id, self.contest.id, e
                );
                let err = GateError::JoinMutationFailed(message);
                self.notifier.notify(err.notice());
                Err(err)
            }
        }
    }

    fn set_reminder(&self) {
        // TODO: persist a reminder subscription once the notification service exposes one
        info!(
            "Reminder requested by {} for upcoming contest {}",
            self.session.user_id, self.contest.id
        );
        self.notifier
            .notify(Notice::info("Reminder set", self.config.reminder_message.clone()));
    }

    fn reject(&self, err: GateError) -> GateError {
        warn!(
            "Join rejected for user {} on contest {}: {}",
            self.session.user_id, self.contest.id, err
        );
        self.notifier.notify(err.notice());
        err
    }
}
