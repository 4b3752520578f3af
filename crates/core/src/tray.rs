//! Tray module - the pieces currently offered to the player
//!
//! Removing a piece keeps the remaining ones in order. The tray is refilled
//! by the session only once it is empty.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::pieces::Piece;
use crate::types::TRAY_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tray {
    slots: ArrayVec<Piece, TRAY_SIZE>,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tray from pieces; anything past capacity is dropped
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        Self {
            slots: pieces.into_iter().take(TRAY_SIZE).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Piece> {
        self.slots.get(index)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter()
    }

    /// Remove and return the piece at `index`, shifting later pieces left
    pub fn take(&mut self, index: usize) -> Option<Piece> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }

    /// Replace the piece at `index`; false if out of range
    pub fn replace(&mut self, index: usize, piece: Piece) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = piece;
                true
            }
            None => false,
        }
    }

    /// Exchange two slots; false if either is out of range
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.slots.len() || b >= self.slots.len() {
            return false;
        }
        self.slots.swap(a, b);
        true
    }

    /// Replace the whole content
    pub fn refill(&mut self, pieces: impl IntoIterator<Item = Piece>) {
        self.slots.clear();
        self.slots.extend(pieces.into_iter().take(TRAY_SIZE));
    }
}
