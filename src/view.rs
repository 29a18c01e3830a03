use iced::{Element, Subscription};

use crate::app::Message;

/// A screen in the MVVM architecture: handles messages, draws itself and
/// declares the event sources it needs.
pub trait View {
    /// Handles a message; returning `Some` requests a screen transition.
    fn update(&mut self, message: Message) -> Option<Message>;

    fn view(&self) -> Element<'_, Message>;

    fn subscription(&self) -> Subscription<Message> {
        Subscription::none()
    }
}
