use parking_lot::RwLock;

use quire_core::{BlogDetail, BlogId, LikeCounts, ViewCounts};

use crate::error::ClientError;
use crate::state::{Epoch, Generation, LoadState, Ticket};

/// Contents of the single-blog view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CurrentSlot {
    #[default]
    Empty,
    Loading(BlogId),
    Ready(BlogDetail),
    Failed { id: BlogId, error: String },
}

impl CurrentSlot {
    pub fn status(&self) -> LoadState {
        match self {
            CurrentSlot::Empty => LoadState::Idle,
            CurrentSlot::Loading(_) => LoadState::Loading,
            CurrentSlot::Ready(_) => LoadState::Ready,
            CurrentSlot::Failed { .. } => LoadState::Error,
        }
    }

    /// Id the slot is showing or waiting for.
    pub fn id(&self) -> Option<&BlogId> {
        match self {
            CurrentSlot::Empty => None,
            CurrentSlot::Loading(id) | CurrentSlot::Failed { id, .. } => Some(id),
            CurrentSlot::Ready(detail) => Some(detail.id()),
        }
    }
}

#[derive(Debug, Default)]
struct CurrentState {
    slot: CurrentSlot,
    generation: Generation,
}

/// The blog currently being viewed or edited.
///
/// Starting a fetch empties the slot, so a previously viewed blog is never
/// shown while another one loads. Only the latest fetch may fill it.
#[derive(Debug, Default)]
pub struct CurrentBlogStore {
    state: RwLock<CurrentState>,
}

impl CurrentBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&self, id: &BlogId) -> Ticket {
        let mut state = self.state.write();
        state.slot = CurrentSlot::Loading(id.clone());
        state.generation.issue()
    }

    /// Apply a fetch result. Returns false if the ticket was superseded.
    pub fn finish_fetch(&self, ticket: Ticket, result: Result<&BlogDetail, &ClientError>) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_current(ticket) {
            return false;
        }

        let next = match (result, &state.slot) {
            (Ok(detail), _) => CurrentSlot::Ready(detail.clone()),
            (Err(e), CurrentSlot::Loading(id)) => CurrentSlot::Failed {
                id: id.clone(),
                error: e.to_string(),
            },
            // A current ticket always pairs with a loading slot.
            (Err(e), other) => CurrentSlot::Failed {
                id: other.id().cloned().unwrap_or_else(|| BlogId::new("")),
                error: e.to_string(),
            },
        };
        state.slot = next;
        true
    }

    pub fn epoch(&self) -> Epoch {
        self.state.read().generation.epoch()
    }

    /// Snapshot taken before a mutation whose result may replace the slot.
    pub fn mark(&self) -> Ticket {
        self.state.read().generation.mark()
    }

    /// Show an updated blog, superseding any fetch still in flight.
    ///
    /// Dropped if a fetch was started, the slot was cleared or the store was
    /// reset after `mark` was taken.
    pub fn replace(&self, mark: Ticket, detail: BlogDetail) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_current(mark) {
            return false;
        }
        state.generation.supersede();
        state.slot = CurrentSlot::Ready(detail);
        true
    }

    pub fn apply_likes(&self, epoch: Epoch, counts: &LikeCounts) -> bool {
        self.update_if(epoch, &counts.id, |d| d.summary.like_count = counts.like_count)
    }

    pub fn apply_views(&self, epoch: Epoch, counts: &ViewCounts) -> bool {
        self.update_if(epoch, &counts.id, |d| d.summary.view_count = counts.view_count)
    }

    fn update_if(&self, epoch: Epoch, id: &BlogId, f: impl FnOnce(&mut BlogDetail)) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) {
            return false;
        }
        match &mut state.slot {
            CurrentSlot::Ready(detail) if detail.id() == id => {
                f(detail);
                true
            }
            _ => false,
        }
    }

    /// Empty the slot if it refers to `id` (after a delete).
    pub fn remove_if(&self, epoch: Epoch, id: &BlogId) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) || state.slot.id() != Some(id) {
            return false;
        }
        state.generation.supersede();
        state.slot = CurrentSlot::Empty;
        true
    }

    /// Empty the slot and discard any fetch in flight.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.generation.supersede();
        state.slot = CurrentSlot::Empty;
    }

    pub fn reset(&self) {
        let mut state = self.state.write();
        state.generation.reset();
        state.slot = CurrentSlot::Empty;
    }

    pub fn slot(&self) -> CurrentSlot {
        self.state.read().slot.clone()
    }

    pub fn detail(&self) -> Option<BlogDetail> {
        match &self.state.read().slot {
            CurrentSlot::Ready(detail) => Some(detail.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadState {
        self.state.read().slot.status()
    }

    pub fn error(&self) -> Option<String> {
        match &self.state.read().slot {
            CurrentSlot::Failed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }
}
