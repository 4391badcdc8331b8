pub mod inference;
pub mod intake;
pub mod relay;
pub mod staging;
