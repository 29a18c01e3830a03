pub mod dpole;
