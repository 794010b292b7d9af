pub mod assistant;
pub mod scheduler;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::ReminderStore;

pub use assistant::{Assistant, Reply};
pub use scheduler::NotificationScheduler;

/// The reminder store shared by command handling, timers and the sweep.
/// Holding the lock serializes every read-modify-persist cycle.
pub type SharedStore = Arc<Mutex<ReminderStore>>;

pub fn shared(store: ReminderStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}
