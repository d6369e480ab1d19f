mod benchmark;
mod generate;
mod schedule;

pub use benchmark::benchmark;
pub use generate::generate;
pub use schedule::schedule;
