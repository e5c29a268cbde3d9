//! Response shapes returned by the Mixpanel endpoints.

pub mod breakdown;
pub mod events;
pub mod export;
pub mod people;

pub use breakdown::*;
pub use events::*;
pub use export::*;
pub use people::*;
