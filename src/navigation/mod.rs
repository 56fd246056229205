pub mod controller;
pub mod history;
pub mod location;

pub use controller::NavigationController;
pub use history::{History, HistoryListener, HistorySubscription, MemoryHistory};
pub use location::{Location, Route};
