pub mod history;
pub mod link;
pub mod operators;
pub mod profile;
pub mod render;
pub mod tracker;

pub use history::History;
pub use link::Link;
pub use operators::Operators;
pub use profile::Profile;
pub use render::Render;
pub use tracker::{TrackedProfile, Tracker};
