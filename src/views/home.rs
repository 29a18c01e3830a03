use iced::{
    widget::{button, column, container, text},
    Alignment, Element, Length,
};
use log::debug;

use crate::{app::Message, envs::registry, view::View};

use super::balance_screen::BalanceMessage;

#[derive(Clone, Debug)]
pub enum HomeMessage {
    Default,
    Launch(String),
}

impl HomeMessage {
    #[must_use]
    pub fn new() -> Self {
        HomeMessage::Default
    }
}

impl Default for HomeMessage {
    fn default() -> Self {
        HomeMessage::new()
    }
}

#[derive(Debug)]
pub struct Home {}

impl Home {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

impl View for Home {
    fn update(&mut self, message: Message) -> Option<Message> {
        if let Message::Home(message) = message {
            match message {
                HomeMessage::Launch(id) => Some(Message::Balance(BalanceMessage::Launch(id))),
                HomeMessage::Default => Some(Message::Home(HomeMessage::Default)),
            }
        } else {
            debug!("Received message for Home but was: {:#?}", message);
            None
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let make_button = |id: &'static str| {
            button(
                text(id)
                    .align_x(iced::alignment::Horizontal::Center)
                    .align_y(iced::alignment::Vertical::Center),
            )
            .on_press(Message::Home(HomeMessage::Launch(id.to_string())))
            .width(220)
            .height(50)
        };

        let mut buttons = column![text("Choose an environment to watch")];
        for id in registry::registered_ids() {
            buttons = buttons.push(make_button(id));
        }

        container(buttons.spacing(20).align_x(Alignment::Center))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(iced::alignment::Horizontal::Center)
            .align_y(iced::alignment::Vertical::Center)
            .into()
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}
