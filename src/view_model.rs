//! The [`ViewModel`] trait for the MVVM architecture.

use crate::app::Message;

/// Mediates between a [`crate::view::View`] and the model it presents.
pub trait ViewModel {
    /// Handles a message on behalf of the view; returning `Some` requests
    /// a screen transition.
    fn update(&mut self, message: Message) -> Option<Message>;
}
