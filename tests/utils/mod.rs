pub mod mocks;
pub mod setup;
