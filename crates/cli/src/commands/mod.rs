pub mod ask;
pub mod doctor;
pub mod models;
pub mod onboard;
