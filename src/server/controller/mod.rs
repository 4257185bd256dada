pub mod action;
pub mod movie;
pub mod program;
pub mod review;
pub mod reward;
