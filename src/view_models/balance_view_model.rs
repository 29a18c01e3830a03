use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, error};
use tokio::task::JoinHandle;

use crate::app::Message;
use crate::envs::registry;
use crate::rl::environment::{EnvError, Environment, RenderMode};
use crate::view_model::ViewModel;
use crate::views::balance_screen::BalanceMessage;

/// Milliseconds between presented frames; matches the simulator's 0.02 s
/// control step (50 fps).
pub const MILLIS_BETWEEN_FRAMES: u64 = 20;

/// What the rollout task reports back to the UI after each step.
#[derive(Clone, Debug)]
pub struct RolloutSnapshot {
    pub width: u32,
    pub height: u32,
    /// Top-down RGBA pixels, ready for an image handle.
    pub rgba: Vec<u8>,
    pub steps: u32,
    pub total_reward: f32,
    pub done: bool,
}

#[derive(Debug)]
pub enum ChannelMessage {
    /// Step the environment once with a random action.
    Advance,
    /// Start a fresh episode.
    Restart,
    /// Request the latest snapshot; answered with [`ChannelMessage::Snapshot`].
    GetSnapshot(Sender<ChannelMessage>),
    Snapshot(RolloutSnapshot),
    Kill,
}

/// Drives a random-action rollout of one environment on a background
/// task and serves frame snapshots to the balance screen.
#[derive(Debug)]
pub struct BalanceViewModel {
    env_id: String,
    sender_to_rollout: Sender<ChannelMessage>,
    rollout_handle: JoinHandle<()>,
    last_snapshot: Option<RolloutSnapshot>,
}

impl BalanceViewModel {
    /// Builds the environment named by `env_id` and starts its rollout
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownEnvironment`] if `env_id` is not
    /// registered.
    pub fn new(env_id: &str) -> Result<Self, EnvError> {
        debug!("New BalanceViewModel for {env_id}");
        let env = registry::make(env_id)?;
        let (sender_to_rollout, receiver_for_rollout) = mpsc::channel::<ChannelMessage>();
        Ok(Self {
            env_id: env_id.to_string(),
            sender_to_rollout,
            rollout_handle: Self::rollout_loop(env, receiver_for_rollout),
            last_snapshot: None,
        })
    }

    fn snapshot_of(
        env: &mut Box<dyn Environment>,
        steps: u32,
        total_reward: f32,
        done: bool,
    ) -> Option<RolloutSnapshot> {
        let frame = env.render(RenderMode::RgbArray)?;
        Some(RolloutSnapshot {
            width: frame.width,
            height: frame.height,
            rgba: frame.to_rgba(),
            steps,
            total_reward,
            done,
        })
    }

    fn rollout_loop(
        mut env: Box<dyn Environment>,
        receiver: Receiver<ChannelMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            env.reset();
            let mut steps: u32 = 0;
            let mut total_reward: f32 = 0.0;
            let mut done = false;
            let mut snapshot = Self::snapshot_of(&mut env, steps, total_reward, done);
            loop {
                let message = match receiver.recv() {
                    Ok(m) => m,
                    Err(e) => {
                        error!("Rollout loop lost its channel: {:#?}", e);
                        break;
                    }
                };
                match message {
                    ChannelMessage::Advance => {
                        if done {
                            continue;
                        }
                        let action = env.sample_action();
                        match env.step(&action) {
                            Ok(step) => {
                                steps += 1;
                                total_reward += step.reward;
                                done = step.done;
                            }
                            Err(e) => {
                                error!("Stepping the environment failed: {e}");
                                continue;
                            }
                        }
                        snapshot = Self::snapshot_of(&mut env, steps, total_reward, done);
                    }
                    ChannelMessage::Restart => {
                        env.reset();
                        steps = 0;
                        total_reward = 0.0;
                        done = false;
                        snapshot = Self::snapshot_of(&mut env, steps, total_reward, done);
                    }
                    ChannelMessage::GetSnapshot(sender) => {
                        if let Some(snapshot) = snapshot.clone() {
                            if let Err(e) = sender.send(ChannelMessage::Snapshot(snapshot)) {
                                error!("Problem sending snapshot back: {:#?}", e);
                            }
                        }
                    }
                    ChannelMessage::Kill => {
                        debug!("Killing rollout loop");
                        env.close();
                        break;
                    }
                    unknown => {
                        error!("Unexpected message in rollout loop: {:#?}", unknown);
                    }
                }
            }
        })
    }

    fn fetch_snapshot(&mut self) {
        let (sender, receiver) = mpsc::channel::<ChannelMessage>();
        if let Err(e) = self
            .sender_to_rollout
            .send(ChannelMessage::GetSnapshot(sender))
        {
            error!("Problem sending to rollout loop: {:#?}", e);
            return;
        }
        match receiver.recv() {
            Ok(ChannelMessage::Snapshot(snapshot)) => self.last_snapshot = Some(snapshot),
            Ok(unknown) => error!("Got unexpected snapshot reply: {:#?}", unknown),
            Err(e) => error!("Problem receiving snapshot: {:#?}", e),
        }
    }

    fn kill_rollout_if_alive(&self) {
        if self.rollout_handle.is_finished() {
            return;
        }
        if let Err(e) = self.sender_to_rollout.send(ChannelMessage::Kill) {
            error!("Error sending kill message to rollout loop: {:#?}", e);
        }
    }

    #[must_use]
    pub fn env_id(&self) -> &str {
        &self.env_id
    }

    #[must_use]
    pub fn last_snapshot(&self) -> Option<&RolloutSnapshot> {
        self.last_snapshot.as_ref()
    }

    #[must_use]
    pub fn get_time_between_frames(&self) -> u64 {
        MILLIS_BETWEEN_FRAMES
    }
}

impl ViewModel for BalanceViewModel {
    fn update(&mut self, message: Message) -> Option<Message> {
        if let Message::Balance(message) = message {
            match message {
                BalanceMessage::Timer(_) => {
                    if let Err(e) = self.sender_to_rollout.send(ChannelMessage::Advance) {
                        error!("Problem ticking rollout loop: {:#?}", e);
                    }
                    self.fetch_snapshot();
                    None
                }
                BalanceMessage::Restart => {
                    if let Err(e) = self.sender_to_rollout.send(ChannelMessage::Restart) {
                        error!("Problem restarting rollout loop: {:#?}", e);
                    }
                    self.fetch_snapshot();
                    None
                }
                BalanceMessage::Home => {
                    self.kill_rollout_if_alive();
                    Some(Message::new_home())
                }
                // Launch is the app switchboard's concern.
                BalanceMessage::Launch(_) => None,
            }
        } else {
            debug!("Received message for Balance but was: {:#?}", message);
            None
        }
    }
}
