use std::collections::HashMap;

use crate::render::viewer::Frame;
use crate::rl::spaces::BoxSpace;

/// Auxiliary information returned by [`Environment::step`]. The
/// environments in this crate always return it empty.
pub type Info = HashMap<String, String>;

/// How a frame should be produced by [`Environment::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw into the viewer's retained frame for on-screen presentation.
    Human,
    /// Return the rendered frame as a pixel array.
    RgbArray,
}

#[derive(Clone, Debug)]
pub enum EnvError {
    /// The action had the wrong number of components.
    InvalidAction(usize),
    /// No environment is registered under the requested id.
    UnknownEnvironment(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::InvalidAction(len) => {
                write!(f, "expected an action of length 1, got length {len}")
            }
            EnvError::UnknownEnvironment(id) => {
                write!(f, "no environment registered under id '{id}'")
            }
        }
    }
}

impl std::error::Error for EnvError {}

/// The result of advancing an environment by one step. The observation
/// borrows the environment's own buffer; copy it out if it must outlive
/// the next call.
#[derive(Debug)]
pub struct Step<'a> {
    pub observation: &'a [f32],
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

/// The standard calling convention every environment in this crate
/// exposes: one caller drives one episode at a time through
/// reset → step* → close.
pub trait Environment: Send {
    /// Reinitializes the environment's own random source and returns the
    /// resolved seed as a one-element vector. When `seed` is `None` a
    /// fresh seed is drawn from entropy.
    fn seed(&mut self, seed: Option<u64>) -> Vec<u64>;

    /// Resamples the start state and returns the observation buffer.
    /// Afterwards the done flag reads 0.
    fn reset(&mut self) -> &[f32];

    /// Advances the environment by one step.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidAction`] if the action does not have
    /// the length the action space declares.
    fn step(&mut self, action: &[f32]) -> Result<Step<'_>, EnvError>;

    /// Draws a uniform random action from the action space using the
    /// environment's own seeded random source.
    fn sample_action(&mut self) -> Vec<f32>;

    /// Renders the current state. Returns a frame only for
    /// [`RenderMode::RgbArray`].
    fn render(&mut self, mode: RenderMode) -> Option<Frame>;

    /// Releases renderer resources if any were allocated. Safe to call
    /// more than once.
    fn close(&mut self);

    /// Declared observation bounds. Descriptive metadata only; nothing
    /// is clipped against these.
    fn observation_space(&self) -> &BoxSpace;

    /// Declared action bounds.
    fn action_space(&self) -> &BoxSpace;
}
