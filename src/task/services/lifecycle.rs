//! Domain rules applied to a task over its lifetime.

use crate::task::domain::{
    DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE, Price, Task, TaskDomainError,
};
use camino::Utf8PathBuf;
use mockable::Clock;
use std::sync::Arc;

/// Prices new tasks and moves tasks to their terminal states.
///
/// The manager performs no I/O and does not guard transitions: it rewrites
/// whatever task it is given. Callers check [`crate::task::domain::TaskStatus::is_terminal`]
/// before asking.
#[derive(Debug)]
pub struct TaskLifecycleManager<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> Clone for TaskLifecycleManager<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> TaskLifecycleManager<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle manager using `clock` for timestamps.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Returns a uniformly random price in `[min, max]`.
    ///
    /// `min` is clamped to zero and `max` to at least `min`.
    #[must_use]
    pub fn assign_price(&self, min: i32, max: i32) -> Price {
        Price::random_in(min, max, &mut rand::rng())
    }

    /// Returns a uniformly random price in the default `[5, 50]` range.
    #[must_use]
    pub fn assign_default_price(&self) -> Price {
        self.assign_price(DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE)
    }

    /// Builds a pending, priced task for an already-resolved source path.
    #[must_use]
    pub fn new_task(&self, original_path: Utf8PathBuf) -> Task {
        Task::new_pending(original_path, self.assign_default_price(), &*self.clock)
    }

    /// Returns a completed copy of `task` with a fresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingImages`] when `task` carries no
    /// variants.
    pub fn mark_completed(&self, task: &Task) -> Result<Task, TaskDomainError> {
        task.completed(&*self.clock)
    }

    /// Returns a failed copy of `task` with a fresh `updated_at`.
    #[must_use]
    pub fn mark_failed(&self, task: &Task) -> Task {
        task.failed(&*self.clock)
    }
}
