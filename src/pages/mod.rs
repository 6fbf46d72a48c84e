mod login;
mod tracker;
mod welcome;

pub use login::Login;
pub use tracker::Tracker;
pub use welcome::Welcome;
