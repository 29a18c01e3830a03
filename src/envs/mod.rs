pub mod longdpole_env;
pub mod registry;
