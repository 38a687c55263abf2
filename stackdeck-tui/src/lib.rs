pub mod decoder;
pub mod model;
pub mod render;
pub mod session;
pub mod spinner;
pub mod theme;

pub use decoder::Key;
pub use model::{Outcome, SelectItem, SelectList, SelectMode};
pub use session::run_select;
pub use spinner::with_spinner;
pub use theme::Theme;
