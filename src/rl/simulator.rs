/// The observation, action and done-flag buffers an environment adapter
/// owns and lends to its simulator on every call. All three are allocated
/// once at construction and never reallocated, so the simulator always
/// writes into the same memory the adapter reads from.
#[derive(Debug)]
pub struct StepBuffers {
    observation: Box<[f32]>,
    action: Box<[f32]>,
    done: [i32; 1],
}

impl StepBuffers {
    #[must_use]
    pub fn new(observation_len: usize, action_len: usize) -> Self {
        Self {
            observation: vec![0.0; observation_len].into_boxed_slice(),
            action: vec![0.0; action_len].into_boxed_slice(),
            done: [0],
        }
    }

    #[must_use]
    pub fn observation(&self) -> &[f32] {
        &self.observation
    }

    pub fn observation_mut(&mut self) -> &mut [f32] {
        &mut self.observation
    }

    #[must_use]
    pub fn action(&self) -> &[f32] {
        &self.action
    }

    pub fn action_mut(&mut self) -> &mut [f32] {
        &mut self.action
    }

    /// 0 while the episode continues, nonzero once it has ended.
    #[must_use]
    pub fn done(&self) -> i32 {
        self.done[0]
    }

    pub fn set_done(&mut self, done: i32) {
        self.done[0] = done;
    }
}

/// The external-simulator capability the adapter consumes: the simulator
/// owns the true system dynamics and the termination checks; the adapter
/// only lends it the buffers and surfaces the results.
pub trait Simulator: Send {
    /// Length of the observation vector the simulator writes.
    fn input_count(&self) -> usize;

    /// Length of the action vector the simulator reads.
    fn output_count(&self) -> usize;

    /// Reseeds the simulator's internal random source.
    fn seed(&mut self, seed: u64);

    /// Resamples the initial state into the observation buffer and clears
    /// the done flag.
    fn reset(&mut self, buffers: &mut StepBuffers);

    /// Consumes the action buffer, advances one simulation tick, writes
    /// the observation and done buffers and returns the scalar reward.
    fn step(&mut self, buffers: &mut StepBuffers) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_have_fixed_lengths() {
        let mut buffers = StepBuffers::new(3, 1);
        assert_eq!(buffers.observation().len(), 3);
        assert_eq!(buffers.action().len(), 1);
        assert_eq!(buffers.done(), 0);

        buffers.observation_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        buffers.action_mut()[0] = -0.5;
        buffers.set_done(1);
        assert_eq!(buffers.observation(), &[1.0, 2.0, 3.0]);
        assert_eq!(buffers.action(), &[-0.5]);
        assert_eq!(buffers.done(), 1);
    }
}
