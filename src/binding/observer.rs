use super::output::OutputUpdate;

/// View-side hook receiving output updates.
///
/// Observers see every update after the session state is settled; they
/// cannot mutate the session.
pub trait OutputObserver: Send {
    fn id(&self) -> &str;
    fn on_update(&mut self, update: &OutputUpdate);
}
