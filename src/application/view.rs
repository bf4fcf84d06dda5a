//! Loading state for one rendered list.
//!
//! A view starts out loading. [`CollectionView::begin`] hands out a
//! [`LoadTicket`] stamped with the current generation, and
//! [`CollectionView::settle`] applies results only while that ticket is
//! still the newest one and the view is attached. Detaching bumps the
//! generation, so a response that arrives after its view went away is
//! dropped instead of written into stale state.

use std::sync::Mutex;

use tracing::debug;

use crate::application::fetcher::CollectionFetcher;
use crate::domain::collections::CollectionEntity;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::view";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
}

#[derive(Debug)]
struct ViewState<T> {
    generation: u64,
    attached: bool,
    loading: bool,
    items: Vec<T>,
}

#[derive(Debug)]
pub struct CollectionView<T> {
    state: Mutex<ViewState<T>>,
}

impl<T> Default for CollectionView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionView<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ViewState {
                generation: 0,
                attached: true,
                loading: true,
                items: Vec::new(),
            }),
        }
    }

    /// Start a load. Returns `None` once the view is detached.
    pub fn begin(&self) -> Option<LoadTicket> {
        let mut state = mutex_lock(&self.state, SOURCE, "begin");
        if !state.attached {
            return None;
        }
        state.generation += 1;
        state.loading = true;
        Some(LoadTicket {
            generation: state.generation,
        })
    }

    /// Apply the result of the load identified by `ticket`. Returns `false`
    /// and leaves the view untouched when the ticket is stale.
    pub fn settle(&self, ticket: LoadTicket, items: Vec<T>) -> bool {
        let mut state = mutex_lock(&self.state, SOURCE, "settle");
        if !state.attached || ticket.generation != state.generation {
            debug!(
                target = "showcase::view",
                ticket = ticket.generation,
                current = state.generation,
                attached = state.attached,
                "discarding stale load result"
            );
            return false;
        }
        state.items = items;
        state.loading = false;
        true
    }

    /// Stop accepting results. Outstanding tickets become stale.
    pub fn detach(&self) {
        let mut state = mutex_lock(&self.state, SOURCE, "detach");
        state.attached = false;
        state.generation += 1;
    }

    pub fn is_attached(&self) -> bool {
        mutex_lock(&self.state, SOURCE, "is_attached").attached
    }

    pub fn into_snapshot(self) -> ViewSnapshot<T> {
        let state = match self.state.into_inner() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        ViewSnapshot {
            items: state.items,
            loading: state.loading,
        }
    }
}

impl<T: Clone> CollectionView<T> {
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        let state = mutex_lock(&self.state, SOURCE, "snapshot");
        ViewSnapshot {
            items: state.items.clone(),
            loading: state.loading,
        }
    }
}

/// Fetch `T`'s collection into `view`. Returns whether the result was applied.
pub async fn load_view<T: CollectionEntity>(
    fetcher: &CollectionFetcher,
    view: &CollectionView<T>,
) -> bool {
    let Some(ticket) = view.begin() else {
        return false;
    };
    let items = fetcher.fetch_entities::<T>().await;
    view.settle(ticket, items)
}

/// Fresh view loaded once and turned into its final snapshot.
pub async fn load_snapshot<T: CollectionEntity>(fetcher: &CollectionFetcher) -> ViewSnapshot<T> {
    let view = CollectionView::new();
    load_view(fetcher, &view).await;
    view.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_view_is_loading_and_empty() {
        let view: CollectionView<u8> = CollectionView::new();
        assert_eq!(
            view.snapshot(),
            ViewSnapshot {
                items: Vec::new(),
                loading: true
            }
        );
    }

    #[test]
    fn settle_applies_items_and_clears_loading() {
        let view = CollectionView::new();
        let ticket = view.begin().expect("attached view");

        assert!(view.settle(ticket, vec![1, 2]));
        assert_eq!(
            view.snapshot(),
            ViewSnapshot {
                items: vec![1, 2],
                loading: false
            }
        );
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let view = CollectionView::new();
        let first = view.begin().expect("attached view");
        let second = view.begin().expect("attached view");

        assert!(!view.settle(first, vec![1]));
        assert!(view.snapshot().loading);
        assert!(view.settle(second, vec![2]));
        assert_eq!(view.snapshot().items, vec![2]);
    }

    #[test]
    fn detached_view_is_never_mutated() {
        let view = CollectionView::new();
        let ticket = view.begin().expect("attached view");
        view.detach();

        assert!(!view.settle(ticket, vec![9]));
        assert!(view.begin().is_none());
        assert!(!view.is_attached());
        assert!(view.snapshot().items.is_empty());
    }
}
