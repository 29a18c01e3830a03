use crate::envs::longdpole_env::LongdpoleEnv;
use crate::rl::environment::{EnvError, Environment};

pub const LONGDPOLE_V0: &str = "LongdpoleEnv-v0";
pub const LONGDPOLE_V1: &str = "LongdpoleEnv-v1";
pub const LONGDPOLE_V2: &str = "LongdpoleEnv-v2";

/// Every id [`make`] accepts.
#[must_use]
pub fn registered_ids() -> [&'static str; 3] {
    [LONGDPOLE_V0, LONGDPOLE_V1, LONGDPOLE_V2]
}

/// Instantiates an environment by its registered id.
///
/// # Errors
///
/// Returns [`EnvError::UnknownEnvironment`] for ids not listed in
/// [`registered_ids`].
pub fn make(id: &str) -> Result<Box<dyn Environment>, EnvError> {
    match id {
        LONGDPOLE_V0 => Ok(Box::new(LongdpoleEnv::v0())),
        LONGDPOLE_V1 => Ok(Box::new(LongdpoleEnv::v1())),
        LONGDPOLE_V2 => Ok(Box::new(LongdpoleEnv::v2())),
        other => Err(EnvError::UnknownEnvironment(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_id_constructs() {
        for id in registered_ids() {
            let mut env = make(id).expect("registered id");
            assert_eq!(env.reset().len(), 3);
            assert_eq!(env.action_space().len(), 1);
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let result = make("LongdpoleEnv-v3");
        assert!(matches!(result, Err(EnvError::UnknownEnvironment(_))));
    }
}
