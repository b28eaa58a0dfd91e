/// Lifecycle of a remote-backed store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl LoadState {
    pub fn is_loading(self) -> bool {
        self == LoadState::Loading
    }
}

/// Issued when a fetch starts. Its result is applied only while the ticket
/// is still the latest one issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Snapshot of a store's reset counter. Mutation results carrying a stale
/// epoch arrived after a reset and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch(u64);

#[derive(Debug, Default)]
pub(crate) struct Generation {
    fetch: u64,
    epoch: u64,
}

impl Generation {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.fetch += 1;
        Ticket(self.fetch)
    }

    /// The latest ticket issued so far, without starting a fetch. It stays
    /// current until the next `issue`, `supersede` or `reset`.
    pub(crate) fn mark(&self) -> Ticket {
        Ticket(self.fetch)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.fetch == ticket.0
    }

    /// Supersede any in-flight fetch.
    pub(crate) fn supersede(&mut self) {
        self.fetch += 1;
    }

    pub(crate) fn epoch(&self) -> Epoch {
        Epoch(self.epoch)
    }

    pub(crate) fn is_live(&self, epoch: Epoch) -> bool {
        self.epoch == epoch.0
    }

    /// Drop everything in flight: fetches and mutations alike.
    pub(crate) fn reset(&mut self) {
        self.fetch += 1;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut generation = Generation::default();
        let first = generation.issue();
        let second = generation.issue();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));

        generation.supersede();
        assert!(!generation.is_current(second));
    }

    #[test]
    fn test_mark_goes_stale_on_next_fetch() {
        let mut generation = Generation::default();
        generation.issue();
        let mark = generation.mark();
        assert!(generation.is_current(mark));

        generation.issue();
        assert!(!generation.is_current(mark));
    }

    #[test]
    fn test_reset_kills_epoch() {
        let mut generation = Generation::default();
        let epoch = generation.epoch();
        let ticket = generation.issue();
        assert!(generation.is_live(epoch));

        generation.reset();
        assert!(!generation.is_live(epoch));
        assert!(!generation.is_current(ticket));
    }
}
