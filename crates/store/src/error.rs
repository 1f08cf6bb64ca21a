use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatStoreError {
    #[snafu(display("member id '{raw}' is blank"))]
    BlankMemberId { stage: &'static str, raw: String },
    #[snafu(display("message id '{raw}' is not a valid uuid"))]
    InvalidMessageId {
        stage: &'static str,
        raw: String,
        source: uuid::Error,
    },
    #[snafu(display("color '{raw}' is not a #RRGGBB hex color"))]
    InvalidHexColor { stage: &'static str, raw: String },
    #[snafu(display("no member with id '{member_id}' exists in the roster"))]
    UnknownMember {
        stage: &'static str,
        member_id: String,
    },
    #[snafu(display("'{raw}' is not a recognized bubble theme"))]
    UnknownTheme { raw: String },
    #[snafu(display("'{raw}' is not a recognized gradient kind"))]
    UnknownGradientKind { raw: String },
    #[snafu(display("message content is empty after trimming"))]
    EmptyMessage,
    #[snafu(display("group name is empty after trimming"))]
    EmptyGroupName,
    #[snafu(display("a gradient needs at least 2 stops, got {count}"))]
    TooFewGradientStops { stage: &'static str, count: usize },
    #[snafu(display("removing a gradient stop would leave {remaining} stops; at least 2 are required"))]
    GradientStopFloor { remaining: usize },
    #[snafu(display("gradient stop index {index} is out of bounds for {count} stops"))]
    StopIndexOutOfBounds { index: usize, count: usize },
    #[snafu(display("background is a solid color; gradient stops do not apply"))]
    NotAGradient { stage: &'static str },
    #[snafu(display("opacity {value} is outside [0, 1]"))]
    OpacityOutOfRange { stage: &'static str, value: f32 },
    #[snafu(display("stop position {value} is outside [0, 100]"))]
    PositionOutOfRange { stage: &'static str, value: f32 },
    #[snafu(display("roster is empty; a chat needs at least one member"))]
    EmptyRoster,
    #[snafu(display("duplicate member id '{member_id}' in roster"))]
    DuplicateMember { member_id: String },
    #[snafu(display("chat session was torn down; handle used outside its provider scope"))]
    SessionClosed { stage: &'static str },
}

pub type StoreResult<T> = Result<T, ChatStoreError>;
