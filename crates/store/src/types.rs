use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{
    ChatStoreError, DuplicateMemberSnafu, EmptyGroupNameSnafu, EmptyRosterSnafu,
    GradientStopFloorSnafu, InvalidHexColorSnafu, NotAGradientSnafu, OpacityOutOfRangeSnafu,
    PositionOutOfRangeSnafu, StopIndexOutOfBoundsSnafu, StoreResult, TooFewGradientStopsSnafu,
    UnknownGradientKindSnafu, UnknownThemeSnafu,
};
use crate::ids::{MemberId, MessageId};

pub const DEFAULT_GROUP_NAME: &str = "Group Chat";
pub const DEFAULT_GRADIENT_DIRECTION: &str = "to-br";
/// A gradient below this stop count cannot render; the editor enforces it.
pub const MIN_GRADIENT_STOPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub avatar_url: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// One transcript entry. Append-only; insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: MemberId,
    pub content: String,
    pub sent_at_unix_seconds: u64,
}

/// Validated `#RRGGBB` color literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn new(raw: impl Into<String>) -> StoreResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#');
        let well_formed = digits
            .map(|rest| rest.len() == 6 && rest.chars().all(|c| c.is_ascii_hexdigit()))
            .unwrap_or(false);
        ensure!(
            well_formed,
            InvalidHexColorSnafu {
                stage: "parse-hex-color",
                raw: trimmed.to_string(),
            }
        );
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    // For vetted palette literals; callers guarantee the `#RRGGBB` shape.
    pub(crate) fn from_static(raw: &'static str) -> Self {
        Self(raw.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            // The constructor only admits "#RRGGBB", so the slice is hex.
            u8::from_str_radix(&self.0[range], 16).unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ChatStoreError;

    fn try_from(raw: String) -> StoreResult<Self> {
        Self::new(raw)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl FromStr for HexColor {
    type Err = ChatStoreError;

    fn from_str(raw: &str) -> StoreResult<Self> {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

impl GradientKind {
    pub const ALL: [GradientKind; 3] = [Self::Linear, Self::Radial, Self::Conic];

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
            Self::Conic => "conic",
        }
    }
}

impl fmt::Display for GradientKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.identifier())
    }
}

impl FromStr for GradientKind {
    type Err = ChatStoreError;

    fn from_str(raw: &str) -> StoreResult<Self> {
        match raw.trim() {
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            "conic" => Ok(Self::Conic),
            other => UnknownGradientKindSnafu {
                raw: other.to_string(),
            }
            .fail(),
        }
    }
}

/// Named visual style applied to message bubbles, independent of the page
/// background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleTheme {
    Rose,
    Minimal,
    Brown,
    Dark,
}

impl BubbleTheme {
    pub const ALL: [BubbleTheme; 4] = [Self::Rose, Self::Minimal, Self::Brown, Self::Dark];

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Rose => "rose",
            Self::Minimal => "minimal",
            Self::Brown => "brown",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for BubbleTheme {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.identifier())
    }
}

impl FromStr for BubbleTheme {
    type Err = ChatStoreError;

    fn from_str(raw: &str) -> StoreResult<Self> {
        match raw.trim() {
            "rose" => Ok(Self::Rose),
            "minimal" => Ok(Self::Minimal),
            "brown" => Ok(Self::Brown),
            "dark" => Ok(Self::Dark),
            other => UnknownThemeSnafu {
                raw: other.to_string(),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: HexColor,
    pub opacity: f32,
    pub position: f32,
}

impl GradientStop {
    pub fn new(color: HexColor, opacity: f32, position: f32) -> Self {
        Self {
            color,
            opacity,
            position,
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        ensure_opacity("validate-gradient-stop", self.opacity)?;
        ensure!(
            (0.0..=100.0).contains(&self.position),
            PositionOutOfRangeSnafu {
                stage: "validate-gradient-stop",
                value: self.position,
            }
        );
        Ok(())
    }
}

fn ensure_opacity(stage: &'static str, value: f32) -> StoreResult<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        OpacityOutOfRangeSnafu { stage, value }
    );
    Ok(())
}

/// Page background configuration. The tag makes solid-vs-gradient field
/// validity a compile-time invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundSettings {
    Solid {
        color: HexColor,
        opacity: f32,
    },
    Gradient {
        kind: GradientKind,
        direction: String,
        stops: Vec<GradientStop>,
    },
}

impl BackgroundSettings {
    pub fn validate(&self) -> StoreResult<()> {
        match self {
            Self::Solid { opacity, .. } => ensure_opacity("validate-solid-background", *opacity),
            Self::Gradient { stops, .. } => {
                ensure!(
                    stops.len() >= MIN_GRADIENT_STOPS,
                    TooFewGradientStopsSnafu {
                        stage: "validate-gradient-background",
                        count: stops.len(),
                    }
                );
                for stop in stops {
                    stop.validate()?;
                }
                Ok(())
            }
        }
    }

    pub fn add_stop(&mut self, stop: GradientStop) -> StoreResult<()> {
        stop.validate()?;
        let stops = self.stops_mut("add-gradient-stop")?;
        stops.push(stop);
        Ok(())
    }

    /// Rejected when removal would leave fewer than [`MIN_GRADIENT_STOPS`].
    pub fn remove_stop(&mut self, index: usize) -> StoreResult<GradientStop> {
        let stops = self.stops_mut("remove-gradient-stop")?;
        ensure!(
            index < stops.len(),
            StopIndexOutOfBoundsSnafu {
                index,
                count: stops.len(),
            }
        );
        ensure!(
            stops.len() > MIN_GRADIENT_STOPS,
            GradientStopFloorSnafu {
                remaining: stops.len() - 1,
            }
        );
        Ok(stops.remove(index))
    }

    pub fn update_stop(&mut self, index: usize, stop: GradientStop) -> StoreResult<()> {
        stop.validate()?;
        let stops = self.stops_mut("update-gradient-stop")?;
        ensure!(
            index < stops.len(),
            StopIndexOutOfBoundsSnafu {
                index,
                count: stops.len(),
            }
        );
        stops[index] = stop;
        Ok(())
    }

    fn stops_mut(&mut self, stage: &'static str) -> StoreResult<&mut Vec<GradientStop>> {
        match self {
            Self::Gradient { stops, .. } => Ok(stops),
            Self::Solid { .. } => NotAGradientSnafu { stage }.fail(),
        }
    }
}

/// Stops of the green gradient the demo boots with.
pub fn default_gradient_stops() -> Vec<GradientStop> {
    vec![
        GradientStop::new(HexColor::from_static("#16a34a"), 0.9, 0.0),
        GradientStop::new(HexColor::from_static("#22c55e"), 0.8, 50.0),
        GradientStop::new(HexColor::from_static("#15803d"), 0.9, 100.0),
    ]
}

/// The green linear gradient the demo boots with.
pub fn default_background() -> BackgroundSettings {
    BackgroundSettings::Gradient {
        kind: GradientKind::Linear,
        direction: DEFAULT_GRADIENT_DIRECTION.to_string(),
        stops: default_gradient_stops(),
    }
}

/// The fixed three-member roster the demo ships with.
pub fn default_roster() -> Vec<Member> {
    vec![
        Member::new(
            MemberId::from_static("imandi"),
            "Imandi",
            "https://i.ibb.co/Ps7N19K6/Screenshot-2025-08-16-040225.png",
        ),
        Member::new(
            MemberId::from_static("sandani"),
            "Sandani",
            "https://i.ibb.co/tTY7CjXH/Screenshot-2025-08-16-040410.png",
        ),
        Member::new(
            MemberId::from_static("sachintha"),
            "Sachintha",
            "https://i.ibb.co/5xYnR26c/Screenshot-2025-08-16-040021.png",
        ),
    ]
}

/// Everything a session needs to build its first snapshot. Sender and viewer
/// both start on the first roster member.
#[derive(Debug, Clone)]
pub struct InitialState {
    pub members: Vec<Member>,
    pub group_name: String,
    pub theme: BubbleTheme,
    pub background: BackgroundSettings,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            members: default_roster(),
            group_name: DEFAULT_GROUP_NAME.to_string(),
            theme: BubbleTheme::Rose,
            background: default_background(),
        }
    }
}

impl InitialState {
    pub fn build(self) -> StoreResult<ChatState> {
        ensure!(!self.members.is_empty(), EmptyRosterSnafu);
        for (index, member) in self.members.iter().enumerate() {
            let duplicated = self.members[..index]
                .iter()
                .any(|earlier| earlier.id == member.id);
            ensure!(
                !duplicated,
                DuplicateMemberSnafu {
                    member_id: member.id.to_string(),
                }
            );
        }
        let group_name = self.group_name.trim().to_string();
        ensure!(!group_name.is_empty(), EmptyGroupNameSnafu);
        self.background.validate()?;

        let first = self.members[0].id.clone();
        Ok(ChatState {
            members: self.members,
            messages: Vec::new(),
            current_sender_id: first.clone(),
            current_viewer_id: first,
            bubble_theme: self.theme,
            group_name,
            background: self.background,
        })
    }
}

/// One immutable snapshot of the whole chat. Consumers read it, never mutate
/// it; only the store produces the next version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatState {
    pub members: Vec<Member>,
    pub messages: Vec<Message>,
    pub current_sender_id: MemberId,
    pub current_viewer_id: MemberId,
    pub bubble_theme: BubbleTheme,
    pub group_name: String,
    pub background: BackgroundSettings,
}

impl ChatState {
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn has_member(&self, id: &MemberId) -> bool {
        self.member(id).is_some()
    }

    /// Viewer-relative ownership: the admin can preview the conversation from
    /// any member's point of view, so this compares against the viewer, not
    /// the sender.
    pub fn is_own_message(&self, message: &Message) -> bool {
        message.sender_id == self.current_viewer_id
    }
}
