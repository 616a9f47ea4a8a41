use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;

/// A central store for propagators.
///
/// Next to every propagator it keeps whether the propagator is active. Deactivation because of
/// entailment is trailed and undone on backtracking; detaching is permanent.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    active: KeyedVec<PropagatorId, TrailedInteger>,
    detached: KeyedVec<PropagatorId, bool>,
}

/// A typed wrapper around a [`PropagatorId`] that allows retrieving concrete propagators from the
/// [`State`](crate::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    /// Get a type-erased handle to the propagator.
    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The identifier the next added propagator receives.
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|b| b.as_ref())
    }

    /// Add a propagator; its activity flag is a fresh trailed integer.
    pub(crate) fn add<P: Propagator>(
        &mut self,
        propagator: P,
        trailed_values: &mut TrailedValues,
    ) -> PropagatorHandle<P> {
        let id = self.propagators.push(Box::new(propagator));
        let _ = self.active.push(trailed_values.grow(1));
        let _ = self.detached.push(false);

        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    pub(crate) fn is_active(&self, id: PropagatorId, trailed_values: &TrailedValues) -> bool {
        !self.detached[id] && trailed_values.read(self.active[id]) != 0
    }

    /// Deactivate the propagator until the current checkpoint is undone.
    pub(crate) fn deactivate(&mut self, id: PropagatorId, trailed_values: &mut TrailedValues) {
        trailed_values.assign(self.active[id], 0);
    }

    pub(crate) fn detach(&mut self, id: PropagatorId) {
        self.detached[id] = true;
    }

    /// Get a reference to the propagator identified by the given handle.
    ///
    /// To prevent downcasting, [`PropagatorStore`] implements [`Index`] and [`IndexMut`] with
    /// [`PropagatorId`] as an index.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    ///
    /// For more info, see [`Self::get_propagator`].
    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self[handle.id].downcast_mut()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
