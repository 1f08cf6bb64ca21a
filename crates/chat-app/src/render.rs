use backstage_store::{ChatState, Message};
use backstage_style::{resolve, style_for};

/// Right-alignment column for the viewer's own bubbles.
const BUBBLE_COLUMN_WIDTH: usize = 64;

/// Header block: group name, roster size, active theme, the two bubble
/// surfaces that theme resolves to, and the resolved page background.
pub fn header(state: &ChatState) -> String {
    let viewer = member_name(state, &state.current_viewer_id);
    let sender = member_name(state, &state.current_sender_id);
    let own = style_for(state.bubble_theme, true);
    let other = style_for(state.bubble_theme, false);

    format!(
        "== {} == ({} members)\n\
         background: {}\n\
         theme: {} | viewer: {} | sender: {}\n\
         own bubble:   {}\n\
         other bubble: {}",
        state.group_name,
        state.members.len(),
        resolve(&state.background),
        state.bubble_theme,
        viewer,
        sender,
        own.surface.css(),
        other.surface.css(),
    )
}

/// Transcript in insertion order, viewer-relative: the viewer's own messages
/// are pushed to the right column.
pub fn transcript(state: &ChatState) -> String {
    if state.messages.is_empty() {
        return "(no messages yet)".to_string();
    }

    state
        .messages
        .iter()
        .map(|message| message_line(state, message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(state: &ChatState) -> String {
    format!("{}\n\n{}", header(state), transcript(state))
}

fn message_line(state: &ChatState, message: &Message) -> String {
    let name = member_name(state, &message.sender_id);
    let bubble = format!("[{name}] {}", message.content);
    if state.is_own_message(message) {
        format!("{bubble:>width$}", width = BUBBLE_COLUMN_WIDTH)
    } else {
        bubble
    }
}

fn member_name(state: &ChatState, id: &backstage_store::MemberId) -> String {
    state
        .member(id)
        .map(|member| member.name.clone())
        .unwrap_or_else(|| id.to_string())
}
