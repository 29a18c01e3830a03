use std::time::{Duration, Instant};

use iced::{
    time,
    widget::{button, column, container, image, row, text},
    Element, Length, Subscription,
};

use crate::{
    app::Message, rl::environment::EnvError, view::View, view_model::ViewModel,
    view_models::balance_view_model::BalanceViewModel,
};

#[derive(Clone, Debug)]
pub enum BalanceMessage {
    /// Open the balance screen for the given environment id.
    Launch(String),
    Timer(Instant),
    Restart,
    Home,
}

/// Shows a running episode of one environment: the rendered frame, the
/// step count and the accumulated reward.
#[derive(Debug)]
pub struct BalanceScreen {
    view_model: BalanceViewModel,
}

impl BalanceScreen {
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownEnvironment`] if `env_id` is not
    /// registered.
    pub fn new(env_id: &str) -> Result<Self, EnvError> {
        Ok(Self {
            view_model: BalanceViewModel::new(env_id)?,
        })
    }
}

impl View for BalanceScreen {
    fn update(&mut self, message: Message) -> Option<Message> {
        self.view_model.update(message)
    }

    fn view(&self) -> Element<'_, Message> {
        let home_button = button(text("Back to Home"))
            .on_press(Message::Balance(BalanceMessage::Home))
            .width(160)
            .height(40);
        let restart_button = button(text("Restart"))
            .on_press(Message::Balance(BalanceMessage::Restart))
            .width(80)
            .height(40);

        let body: Element<Message> = match self.view_model.last_snapshot() {
            Some(snapshot) => {
                let handle = image::Handle::from_rgba(
                    snapshot.width,
                    snapshot.height,
                    snapshot.rgba.clone(),
                );
                let status = if snapshot.done {
                    format!(
                        "Episode finished after {} steps, total reward {:.0}",
                        snapshot.steps, snapshot.total_reward
                    )
                } else {
                    format!(
                        "Step {}, total reward {:.0}",
                        snapshot.steps, snapshot.total_reward
                    )
                };
                column![image(handle), text(status)].spacing(10).into()
            }
            None => text(format!("Starting {}...", self.view_model.env_id())).into(),
        };

        container(
            column![row![home_button, restart_button].spacing(10), body].spacing(10),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        time::every(Duration::from_millis(
            self.view_model.get_time_between_frames(),
        ))
        .map(BalanceMessage::Timer)
        .map(Message::Balance)
    }
}
