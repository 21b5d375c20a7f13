/// Prayer periods and the active-window resolver
///
/// - `name.rs` - the six named prayers in daily order
/// - `resolver.rs` - which period is active right now and which comes next

pub mod name;
pub mod resolver;

pub use name::PrayerName;
pub use resolver::{resolve, ResolvedState};
