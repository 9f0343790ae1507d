pub mod new;
pub mod show;
