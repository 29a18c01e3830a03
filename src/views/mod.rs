pub mod balance_screen;
pub mod home;
