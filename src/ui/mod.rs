/// View helpers for the main window
///
/// - `cards.rs` - the six prayer time cards and the countdown banner
/// - `picker.rs` - city and district result lists

pub mod cards;
pub mod picker;
