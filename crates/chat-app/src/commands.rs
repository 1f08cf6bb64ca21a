use std::num::{ParseFloatError, ParseIntError};

use backstage_store::{
    BackgroundSettings, BubbleTheme, ChatHandle, ChatStoreError, GradientKind, GradientStop,
    HexColor, MemberId, default_gradient_stops,
};
use backstage_style::{LINEAR_DIRECTIONS, resolve, theme_catalog};
use snafu::{ResultExt, Snafu};

use crate::render;

#[derive(Debug, Snafu)]
pub enum CommandError {
    #[snafu(display("unknown command '{name}'; try 'help'"))]
    UnknownCommand { name: String },
    #[snafu(display("usage: {usage}"))]
    MissingArgument { usage: &'static str },
    #[snafu(display("'{raw}' is not a number"))]
    InvalidNumber {
        raw: String,
        source: ParseFloatError,
    },
    #[snafu(display("'{raw}' is not a stop index"))]
    InvalidIndex { raw: String, source: ParseIntError },
    #[snafu(transparent)]
    Store { source: ChatStoreError },
    #[snafu(display("failed to serialize chat state"))]
    SerializeState { source: serde_json::Error },
}

pub type CommandResult<T> = Result<T, CommandError>;

/// One admin-panel action. Mutations map one-to-one onto the store's
/// operations; the rest are read-only views over the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(String),
    Sender(String),
    Viewer(String),
    Theme(String),
    Name(String),
    BgSolid { color: String, opacity: f32 },
    BgGradient { kind: String, direction: Option<String> },
    StopAdd { color: String, opacity: f32, position: f32 },
    StopRemove { index: usize },
    Themes,
    Members,
    Show,
    Dump,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> CommandResult<Self> {
        let trimmed = line.trim();
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "send" => Ok(Self::Send(rest.to_string())),
            "sender" => Ok(Self::Sender(rest.to_string())),
            "viewer" => Ok(Self::Viewer(rest.to_string())),
            "theme" => Ok(Self::Theme(rest.to_string())),
            "name" => Ok(Self::Name(rest.to_string())),
            "bg" => Self::parse_bg(rest),
            "stop" => Self::parse_stop(rest),
            "themes" => Ok(Self::Themes),
            "members" => Ok(Self::Members),
            "show" => Ok(Self::Show),
            "dump" => Ok(Self::Dump),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => UnknownCommandSnafu {
                name: other.to_string(),
            }
            .fail(),
        }
    }

    fn parse_bg(rest: &str) -> CommandResult<Self> {
        let mut words = rest.split_whitespace();
        match words.next() {
            Some("solid") => {
                let color = words.next().map(str::to_string);
                let opacity = words.next();
                match (color, opacity) {
                    (Some(color), Some(raw)) => Ok(Self::BgSolid {
                        color,
                        opacity: parse_number(raw)?,
                    }),
                    _ => MissingArgumentSnafu {
                        usage: "bg solid <#rrggbb> <opacity>",
                    }
                    .fail(),
                }
            }
            Some("gradient") => match words.next() {
                Some(kind) => Ok(Self::BgGradient {
                    kind: kind.to_string(),
                    direction: words.next().map(str::to_string),
                }),
                None => MissingArgumentSnafu {
                    usage: "bg gradient <linear|radial|conic> [direction]",
                }
                .fail(),
            },
            _ => MissingArgumentSnafu {
                usage: "bg solid <#rrggbb> <opacity> | bg gradient <kind> [direction]",
            }
            .fail(),
        }
    }

    fn parse_stop(rest: &str) -> CommandResult<Self> {
        let mut words = rest.split_whitespace();
        match words.next() {
            Some("add") => {
                let (color, opacity, position) = match (words.next(), words.next(), words.next()) {
                    (Some(color), Some(opacity), Some(position)) => (color, opacity, position),
                    _ => {
                        return MissingArgumentSnafu {
                            usage: "stop add <#rrggbb> <opacity> <position>",
                        }
                        .fail();
                    }
                };
                Ok(Self::StopAdd {
                    color: color.to_string(),
                    opacity: parse_number(opacity)?,
                    position: parse_number(position)?,
                })
            }
            Some("remove") => match words.next() {
                Some(raw) => Ok(Self::StopRemove {
                    index: raw.parse().context(InvalidIndexSnafu {
                        raw: raw.to_string(),
                    })?,
                }),
                None => MissingArgumentSnafu {
                    usage: "stop remove <index>",
                }
                .fail(),
            },
            _ => MissingArgumentSnafu {
                usage: "stop add <#rrggbb> <opacity> <position> | stop remove <index>",
            }
            .fail(),
        }
    }
}

fn parse_number(raw: &str) -> CommandResult<f32> {
    raw.parse().context(InvalidNumberSnafu {
        raw: raw.to_string(),
    })
}

/// Runs one command against the store behind `handle` and returns the text
/// to show in the panel. Store rejections surface as short messages; the
/// snapshot is unchanged in that case.
pub fn apply(command: &Command, handle: &ChatHandle) -> CommandResult<String> {
    let store = handle.store()?;
    match command {
        Command::Send(content) => {
            store.send_message(content)?;
            Ok(render::transcript(&store.snapshot()))
        }
        Command::Sender(raw) => {
            let id: MemberId = raw.parse()?;
            store.set_current_sender(&id)?;
            Ok(format!("now sending as '{id}'"))
        }
        Command::Viewer(raw) => {
            let id: MemberId = raw.parse()?;
            store.set_current_viewer(&id)?;
            Ok(format!("now viewing as '{id}'"))
        }
        Command::Theme(raw) => {
            let theme: BubbleTheme = raw.parse()?;
            store.set_theme(theme)?;
            Ok(format!("bubble theme set to '{theme}'"))
        }
        Command::Name(raw) => {
            store.set_group_name(raw)?;
            Ok(format!("group renamed to '{}'", store.snapshot().group_name))
        }
        Command::BgSolid { color, opacity } => {
            let background = BackgroundSettings::Solid {
                color: color.parse()?,
                opacity: *opacity,
            };
            store.set_background(background)?;
            Ok(format!(
                "background: {}",
                resolve(&store.snapshot().background)
            ))
        }
        Command::BgGradient { kind, direction } => {
            let kind: GradientKind = kind.parse()?;
            let snapshot = store.snapshot();
            // Switching type keeps the stops already configured, the way the
            // customizer's draft does; coming from a solid color starts from
            // the default stops.
            let (current_direction, stops) = match &snapshot.background {
                BackgroundSettings::Gradient {
                    direction, stops, ..
                } => (direction.clone(), stops.clone()),
                BackgroundSettings::Solid { .. } => (
                    backstage_store::DEFAULT_GRADIENT_DIRECTION.to_string(),
                    default_gradient_stops(),
                ),
            };
            let background = BackgroundSettings::Gradient {
                kind,
                direction: direction.clone().unwrap_or(current_direction),
                stops,
            };
            store.set_background(background)?;
            Ok(format!(
                "background: {}",
                resolve(&store.snapshot().background)
            ))
        }
        Command::StopAdd {
            color,
            opacity,
            position,
        } => {
            let mut background = store.snapshot().background.clone();
            let color: HexColor = color.parse()?;
            background.add_stop(GradientStop::new(color, *opacity, *position))?;
            store.set_background(background)?;
            Ok(format!(
                "background: {}",
                resolve(&store.snapshot().background)
            ))
        }
        Command::StopRemove { index } => {
            let mut background = store.snapshot().background.clone();
            background.remove_stop(*index)?;
            store.set_background(background)?;
            Ok(format!(
                "background: {}",
                resolve(&store.snapshot().background)
            ))
        }
        Command::Themes => {
            let current = store.snapshot().bubble_theme;
            let lines = theme_catalog()
                .iter()
                .map(|info| {
                    let marker = if info.theme == current { '*' } else { ' ' };
                    format!(
                        "{marker} {:8} {} - {}",
                        info.theme.identifier(),
                        info.name,
                        info.description
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            let directions = LINEAR_DIRECTIONS
                .iter()
                .map(|(value, _)| *value)
                .collect::<Vec<_>>()
                .join(" ");
            Ok(format!("{lines}\nlinear directions: {directions}"))
        }
        Command::Members => {
            let state = store.snapshot();
            let lines = state
                .members
                .iter()
                .map(|member| {
                    let mut tags = Vec::new();
                    if member.id == state.current_sender_id {
                        tags.push("sender");
                    }
                    if member.id == state.current_viewer_id {
                        tags.push("viewer");
                    }
                    let tags = if tags.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", tags.join(", "))
                    };
                    format!("{:10} {}{tags}", member.id.as_str(), member.name)
                })
                .collect::<Vec<_>>()
                .join("\n");
            Ok(lines)
        }
        Command::Show => Ok(render::render(&store.snapshot())),
        Command::Dump => {
            serde_json::to_string_pretty(&*store.snapshot()).context(SerializeStateSnafu)
        }
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Quit => Ok("bye".to_string()),
    }
}

const HELP_TEXT: &str = "\
commands:
  send <text>                          send a message as the current sender
  sender <member-id>                   impersonate a member
  viewer <member-id>                   switch whose point of view renders
  theme <rose|minimal|brown|dark>      set the bubble theme
  name <text>                          rename the group
  bg solid <#rrggbb> <opacity>         solid page background
  bg gradient <kind> [direction]       gradient page background
  stop add <#rrggbb> <opacity> <pos>   add a gradient stop
  stop remove <index>                  remove a gradient stop (min 2 remain)
  themes | members | show | dump       inspect current state
  help | quit";

#[cfg(test)]
mod tests {
    use backstage_store::{ChatSession, InitialState};

    use super::*;

    fn session() -> ChatSession {
        ChatSession::new(InitialState::default()).unwrap()
    }

    fn run(handle: &ChatHandle, line: &str) -> CommandResult<String> {
        apply(&Command::parse(line)?, handle)
    }

    #[test]
    fn parse_keeps_message_text_intact() {
        assert_eq!(
            Command::parse("send hello  there").unwrap(),
            Command::Send("hello  there".to_string())
        );
        assert_eq!(
            Command::parse("name Weekend Plans").unwrap(),
            Command::Name("Weekend Plans".to_string())
        );
    }

    #[test]
    fn parse_rejects_unknown_and_incomplete_commands() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(CommandError::UnknownCommand { .. })
        ));
        assert!(matches!(
            Command::parse("bg solid #ffffff"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse("stop remove x"),
            Err(CommandError::InvalidIndex { .. })
        ));
        assert!(matches!(
            Command::parse("bg solid #ffffff abc"),
            Err(CommandError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn mutations_flow_through_to_the_store() {
        let session = session();
        let handle = session.handle();

        run(&handle, "sender sandani").unwrap();
        run(&handle, "send hello").unwrap();
        run(&handle, "viewer sandani").unwrap();
        run(&handle, "theme dark").unwrap();
        run(&handle, "name Weekend Plans").unwrap();

        let state = handle.store().unwrap().snapshot();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender_id.as_str(), "sandani");
        assert_eq!(state.bubble_theme, BubbleTheme::Dark);
        assert_eq!(state.group_name, "Weekend Plans");
        assert!(state.is_own_message(&state.messages[0]));
    }

    #[test]
    fn store_rejections_become_panel_messages() {
        let session = session();
        let handle = session.handle();

        let blank = run(&handle, "send   ");
        assert!(matches!(blank, Err(CommandError::Store { .. })));
        let unknown = run(&handle, "sender nobody");
        assert!(matches!(unknown, Err(CommandError::Store { .. })));
        let bad_theme = run(&handle, "theme neon");
        assert!(matches!(bad_theme, Err(CommandError::Store { .. })));
        assert!(handle.store().unwrap().snapshot().messages.is_empty());
    }

    #[test]
    fn background_commands_replace_and_edit_stops() {
        let session = session();
        let handle = session.handle();

        let output = run(&handle, "bg solid #22c55e 0.5").unwrap();
        assert_eq!(output, "background: rgba(34, 197, 94, 0.5)");

        // Back to a gradient: solid origin means the default stops return.
        let output = run(&handle, "bg gradient radial").unwrap();
        assert!(output.starts_with("background: radial-gradient(circle,"));

        run(&handle, "stop add #ffffff 1 100").unwrap();
        let state = handle.store().unwrap().snapshot();
        let BackgroundSettings::Gradient { stops, .. } = &state.background else {
            panic!("expected a gradient");
        };
        assert_eq!(stops.len(), 4);

        run(&handle, "stop remove 0").unwrap();
        run(&handle, "stop remove 0").unwrap();
        let floor = run(&handle, "stop remove 0");
        assert!(matches!(floor, Err(CommandError::Store { .. })));
    }

    #[test]
    fn gradient_direction_override_lands_in_the_css() {
        let session = session();
        let handle = session.handle();
        let output = run(&handle, "bg gradient linear to-r").unwrap();
        assert!(output.starts_with("background: linear-gradient(to-r,"));
    }

    #[test]
    fn dump_serializes_the_snapshot() {
        let session = session();
        let handle = session.handle();
        let dump = run(&handle, "dump").unwrap();
        assert!(dump.contains("\"group_name\": \"Group Chat\""));
        assert!(dump.contains("\"type\": \"gradient\""));
    }

    #[test]
    fn commands_fail_loudly_after_session_teardown() {
        let handle = {
            let session = session();
            session.handle()
        };
        assert!(matches!(
            run(&handle, "show"),
            Err(CommandError::Store { .. })
        ));
    }
}
