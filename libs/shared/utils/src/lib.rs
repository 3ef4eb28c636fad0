pub mod extractor;
pub mod form;
pub mod jwt;
pub mod state;
pub mod test_utils;

pub use state::AppState;
