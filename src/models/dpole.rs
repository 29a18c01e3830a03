use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rl::simulator::{Simulator, StepBuffers};

const GRAVITY: f64 = -9.8;
const MASSCART: f64 = 1.0;
const MASSPOLE_1: f64 = 0.1;
const LENGTH_1: f64 = 0.5;
const MUP: f64 = 0.000_002;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.01;
const NUM_STATES: usize = 6;

/// Observation length: cart position and the two pole angles.
pub const NUM_INPUTS: usize = 3;
/// Action length: the torque command.
pub const NUM_OUTPUTS: usize = 1;

/// 36 degrees; a pole past this angle ends the episode.
pub const ANGLE_EDGE: f64 = 0.628_329;
/// Track half-width in meters; the cart past this ends the episode.
pub const TRACK_EDGE: f64 = 2.4;
/// Step-count ceiling per episode.
pub const MAX_STEPS: u32 = 1000;

/// Half-length of the first pole in meters.
pub const POLE1_HALF_LENGTH: f64 = LENGTH_1;

/// Two poles of configurable length and mass attached by unactuated
/// joints to a cart on a frictionless track. The state is integrated
/// with fourth-order Runge-Kutta, two substeps of `TAU` seconds per
/// control step.
///
/// State layout: cart position, cart velocity, pole-1 angle, pole-1
/// angular velocity, pole-2 angle, pole-2 angular velocity.
#[derive(Debug)]
pub struct Dpole {
    state: [f64; NUM_STATES],
    length_2: f64,
    masspole_2: f64,
    steps: u32,
    rng: StdRng,
}

impl Dpole {
    /// A simulator with the second pole equal to the first. Seeds its
    /// random source from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: [0.0; NUM_STATES],
            length_2: LENGTH_1,
            masspole_2: MASSPOLE_1,
            steps: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Configures the second pole's half-length (m) and mass (kg).
    /// Nonpositive values are ignored.
    pub fn set_pole2(&mut self, half_length: f64, mass: f64) {
        if half_length <= 0.0 || mass <= 0.0 {
            warn!("Ignoring invalid second-pole configuration: half_length={half_length}, mass={mass}");
            return;
        }
        self.length_2 = half_length;
        self.masspole_2 = mass;
    }

    /// Half-length of the second pole in meters.
    #[must_use]
    pub fn pole2_half_length(&self) -> f64 {
        self.length_2
    }

    fn write_observation(&self, buffers: &mut StepBuffers) {
        let observation = buffers.observation_mut();
        observation[0] = self.state[0] as f32;
        observation[1] = self.state[2] as f32;
        observation[2] = self.state[4] as f32;
    }

    fn outside_bounds(&self) -> bool {
        self.state[0].abs() > TRACK_EDGE
            || self.state[2].abs() > ANGLE_EDGE
            || self.state[4].abs() > ANGLE_EDGE
    }

    /// Time derivative of the full state under the given force command.
    fn derivatives(&self, force: f64, st: &[f64; NUM_STATES]) -> [f64; NUM_STATES] {
        let costheta_1 = st[2].cos();
        let sintheta_1 = st[2].sin();
        let costheta_2 = st[4].cos();
        let sintheta_2 = st[4].sin();
        let gsintheta_1 = GRAVITY * sintheta_1;
        let gsintheta_2 = GRAVITY * sintheta_2;

        let ml_1 = LENGTH_1 * MASSPOLE_1;
        let ml_2 = self.length_2 * self.masspole_2;
        let temp_1 = MUP * st[3] / ml_1;
        let temp_2 = MUP * st[5] / ml_2;
        let fi_1 =
            ml_1 * st[3] * st[3] * sintheta_1 + 0.75 * MASSPOLE_1 * costheta_1 * (temp_1 + gsintheta_1);
        let fi_2 = ml_2 * st[5] * st[5] * sintheta_2
            + 0.75 * self.masspole_2 * costheta_2 * (temp_2 + gsintheta_2);
        let mi_1 = MASSPOLE_1 * (1.0 - 0.75 * costheta_1 * costheta_1);
        let mi_2 = self.masspole_2 * (1.0 - 0.75 * costheta_2 * costheta_2);

        let xacc = (force + fi_1 + fi_2) / (mi_1 + mi_2 + MASSCART);
        [
            st[1],
            xacc,
            st[3],
            -0.75 * (xacc * costheta_1 + gsintheta_1 + temp_1) / LENGTH_1,
            st[5],
            -0.75 * (xacc * costheta_2 + gsintheta_2 + temp_2) / self.length_2,
        ]
    }

    /// One fourth-order Runge-Kutta step of `TAU` seconds.
    fn rk4(&self, force: f64, y: [f64; NUM_STATES]) -> [f64; NUM_STATES] {
        let hh = TAU * 0.5;
        let h6 = TAU / 6.0;

        let dydx = self.derivatives(force, &y);
        let mut yt = [0.0; NUM_STATES];
        for i in 0..NUM_STATES {
            yt[i] = y[i] + hh * dydx[i];
        }
        let dyt = self.derivatives(force, &yt);
        for i in 0..NUM_STATES {
            yt[i] = y[i] + hh * dyt[i];
        }
        let dym = self.derivatives(force, &yt);
        for i in 0..NUM_STATES {
            yt[i] = y[i] + TAU * dym[i];
        }
        let dyt2 = self.derivatives(force, &yt);

        let mut out = [0.0; NUM_STATES];
        for i in 0..NUM_STATES {
            out[i] = y[i] + h6 * (dydx[i] + dyt2[i] + 2.0 * (dym[i] + dyt[i]));
        }
        out
    }

    fn perform_action(&mut self, action: f64) {
        let force = action.clamp(-1.0, 1.0) * FORCE_MAG;
        // Two substeps per control step, 0.02 s of simulated time.
        for _ in 0..2 {
            self.state = self.rk4(force, self.state);
        }
    }
}

impl Default for Dpole {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for Dpole {
    fn input_count(&self) -> usize {
        NUM_INPUTS
    }

    fn output_count(&self) -> usize {
        NUM_OUTPUTS
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn reset(&mut self, buffers: &mut StepBuffers) {
        self.state[0] = self.rng.gen_range(-1.944..=1.944);
        self.state[1] = self.rng.gen_range(-1.215..=1.215);
        self.state[2] = self.rng.gen_range(-0.104_72..=0.104_72);
        self.state[3] = self.rng.gen_range(-0.135..=0.135);
        self.state[4] = self.rng.gen_range(-0.104_72..=0.104_72);
        self.state[5] = self.rng.gen_range(-0.135..=0.135);
        self.steps = 0;
        self.write_observation(buffers);
        buffers.set_done(0);
    }

    fn step(&mut self, buffers: &mut StepBuffers) -> f32 {
        let action = f64::from(buffers.action()[0]);
        self.perform_action(action);
        self.steps += 1;
        self.write_observation(buffers);
        if self.outside_bounds() {
            buffers.set_done(1);
            return 0.0;
        }
        if self.steps >= MAX_STEPS {
            buffers.set_done(1);
        }
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers() -> StepBuffers {
        StepBuffers::new(NUM_INPUTS, NUM_OUTPUTS)
    }

    #[test]
    fn reset_samples_within_documented_ranges() {
        let mut sim = Dpole::new();
        sim.seed(3);
        let mut buffers = buffers();
        for _ in 0..200 {
            sim.reset(&mut buffers);
            let obs = buffers.observation();
            assert!(obs[0].abs() <= 1.944);
            assert!(obs[1].abs() <= 0.104_72);
            assert!(obs[2].abs() <= 0.104_72);
            assert_eq!(buffers.done(), 0);
        }
    }

    #[test]
    fn same_seed_gives_same_trajectory() {
        let mut a = Dpole::new();
        let mut b = Dpole::new();
        a.seed(42);
        b.seed(42);
        let mut ba = buffers();
        let mut bb = buffers();
        a.reset(&mut ba);
        b.reset(&mut bb);
        assert_eq!(ba.observation(), bb.observation());
        for i in 0..50 {
            let torque = if i % 2 == 0 { 0.3 } else { -0.3 };
            ba.action_mut()[0] = torque;
            bb.action_mut()[0] = torque;
            let ra = a.step(&mut ba);
            let rb = b.step(&mut bb);
            assert_eq!(ra, rb);
            assert_eq!(ba.observation(), bb.observation());
            assert_eq!(ba.done(), bb.done());
        }
    }

    #[test]
    fn upright_equilibrium_hits_the_step_ceiling() {
        let mut sim = Dpole::new();
        sim.state = [0.0; NUM_STATES];
        let mut buffers = buffers();
        for step in 1..=MAX_STEPS {
            buffers.action_mut()[0] = 0.0;
            let reward = sim.step(&mut buffers);
            assert!((reward - 1.0).abs() < f32::EPSILON);
            if step < MAX_STEPS {
                assert_eq!(buffers.done(), 0, "ended early at step {step}");
            }
        }
        assert_eq!(buffers.done(), 1);
    }

    #[test]
    fn leaning_poles_fall_and_end_the_episode() {
        let mut sim = Dpole::new();
        sim.state = [0.0; NUM_STATES];
        sim.state[2] = 0.05;
        sim.state[4] = 0.05;
        let mut buffers = buffers();
        let mut terminated = false;
        for _ in 0..MAX_STEPS {
            buffers.action_mut()[0] = 0.0;
            let reward = sim.step(&mut buffers);
            if buffers.done() != 0 {
                assert!(reward.abs() < f32::EPSILON);
                terminated = true;
                break;
            }
        }
        assert!(terminated, "poles never fell");
    }

    #[test]
    fn cart_pushed_off_the_track_terminates() {
        let mut sim = Dpole::new();
        sim.state = [0.0; NUM_STATES];
        let mut buffers = buffers();
        let mut terminated = false;
        for _ in 0..MAX_STEPS {
            buffers.action_mut()[0] = 1.0;
            sim.step(&mut buffers);
            if buffers.done() != 0 {
                terminated = true;
                break;
            }
        }
        assert!(terminated, "constant push never ended the episode");
    }

    #[test]
    fn invalid_pole2_configuration_is_ignored() {
        let mut sim = Dpole::new();
        sim.set_pole2(0.25, 0.05);
        assert!((sim.pole2_half_length() - 0.25).abs() < f64::EPSILON);
        sim.set_pole2(-1.0, 0.05);
        assert!((sim.pole2_half_length() - 0.25).abs() < f64::EPSILON);
    }
}
