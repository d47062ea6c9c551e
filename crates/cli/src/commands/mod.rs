pub mod config;
pub mod doctor;
pub mod run;
pub mod topics;
