pub mod link;
pub mod stats;

pub use link::Entity as LinkEntity;
pub use stats::Entity as StatsEntity;
