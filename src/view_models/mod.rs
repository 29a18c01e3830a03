pub mod balance_view_model;
