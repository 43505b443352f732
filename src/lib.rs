//! The hat draw: `n` people draw each other's names from a hat, putting their
//! own name back whenever they pick it, and starting over if the last person
//! is left holding only their own. How often does "who drew whom" form one
//! big loop through everybody?

pub mod config;
pub mod cycle;
pub mod error;
pub mod estimate;
pub mod exact;
pub mod hat;
pub mod permutation;
pub mod report;

pub use config::Settings;
pub use cycle::is_hamiltonian;
pub use error::HatError;
pub use estimate::{draw_stats, estimate, sweep, DrawStat, DrawStats, Estimate};
pub use hat::{pass_around_hat, Draw, Hat};
pub use permutation::Permutation;
pub use report::Report;
