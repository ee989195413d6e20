pub mod library;
pub mod models;
pub mod rig;

pub use library::{accent_color, create_fixture_node, profile, profiles};
pub use models::{ChannelDef, ChannelKind, FixtureProfile};
pub use rig::default_rig;
