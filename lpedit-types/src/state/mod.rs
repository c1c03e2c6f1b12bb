pub mod parameter;
pub mod pod;
pub mod preset;
pub mod session;
pub mod set;

pub use parameter::Parameter;
pub use pod::Pod;
pub use preset::{Dt, PedalBoardItem, Preset};
pub use session::SessionState;
pub use set::Set;
