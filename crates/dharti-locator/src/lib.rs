//! dharti-locator
//!
//! Turns parcel-id / owner / address input into a point (and, when possible,
//! a parcel), then drives the globe and map views to it.

pub mod camera;
pub mod provider;
pub mod resolver;
pub mod session;

pub use camera::{CameraDirector, FocusTarget, NavCommand, ViewMode, ViewSurface};
pub use provider::ProviderCache;
pub use resolver::{LocateQuery, Resolution, ResolutionSource, Resolver};
pub use session::{LocatorSession, SearchOutcome, SearchSequencer, SearchTicket};
