use iced::{Element, Subscription};
use log::{debug, error};

use crate::{
    view::View,
    views::{
        balance_screen::{BalanceMessage, BalanceScreen},
        home::{Home, HomeMessage},
    },
};

pub struct State {
    screen: Screen,
}

#[derive(Debug)]
enum Screen {
    Home(Home),
    Balance(BalanceScreen),
}

impl Screen {
    pub fn new_home() -> Self {
        Screen::Home(Home::new())
    }

    pub fn new_balance(env_id: &str) -> Self {
        match BalanceScreen::new(env_id) {
            Ok(screen) => Screen::Balance(screen),
            Err(e) => {
                error!("Could not open balance screen: {e}");
                Screen::new_home()
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum Message {
    Home(HomeMessage),
    Balance(BalanceMessage),
}

impl Message {
    #[must_use]
    pub fn new_home() -> Self {
        Message::Home(HomeMessage::new())
    }
}

impl View for Screen {
    fn update(&mut self, message: Message) -> Option<Message> {
        match (self, message) {
            (Screen::Home(screen), msg) => screen.update(msg),
            (Screen::Balance(screen), msg) => screen.update(msg),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        match self {
            Screen::Home(screen) => screen.view(),
            Screen::Balance(screen) => screen.view(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        match self {
            Screen::Home(screen) => screen.subscription(),
            Screen::Balance(screen) => screen.subscription(),
        }
    }
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::new_home(),
        }
    }

    pub fn update(state: &mut State, message: Message) {
        if let Some(next) = state.screen.update(message) {
            match next {
                Message::Home(_) => state.screen = Screen::new_home(),
                Message::Balance(BalanceMessage::Launch(id)) => {
                    state.screen = Screen::new_balance(&id);
                }
                other => debug!("Ignoring transition message: {:#?}", other),
            }
        }
    }

    #[must_use]
    pub fn view(state: &State) -> Element<'_, Message> {
        state.screen.view()
    }

    #[must_use]
    pub fn subscription(state: &State) -> Subscription<Message> {
        state.screen.subscription()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
