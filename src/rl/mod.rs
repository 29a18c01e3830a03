pub mod environment;
pub mod simulator;
pub mod spaces;
