mod state;

pub use state::{AppState, ChartCache};
