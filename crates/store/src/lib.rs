pub mod error;
pub mod ids;
pub mod session;
pub mod store;
pub mod types;

pub use error::{ChatStoreError, StoreResult};
pub use ids::{MemberId, MessageId};
pub use session::{ChatHandle, ChatSession};
pub use store::{ChatEvent, ChatStore, SubscriptionId};
pub use types::{
    BackgroundSettings, BubbleTheme, ChatState, DEFAULT_GRADIENT_DIRECTION, DEFAULT_GROUP_NAME,
    GradientKind, GradientStop, HexColor, InitialState, MIN_GRADIENT_STOPS, Member, Message,
    default_background, default_gradient_stops, default_roster,
};
