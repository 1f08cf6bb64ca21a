use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use snafu::ensure;

use crate::error::{EmptyGroupNameSnafu, EmptyMessageSnafu, StoreResult, UnknownMemberSnafu};
use crate::ids::{MemberId, MessageId};
use crate::types::{BackgroundSettings, BubbleTheme, ChatState, InitialState, Message};

/// What changed in the snapshot a notification carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    MessageAdded { id: MessageId },
    SenderChanged,
    ViewerChanged,
    ThemeChanged,
    GroupRenamed,
    BackgroundChanged,
}

/// Handle returned by [`ChatStore::subscribe`], used to detach again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&ChatEvent, &Arc<ChatState>) + Send + Sync>;

/// Sole owner of the current [`ChatState`] snapshot.
///
/// Readers take lock-free snapshots off an `ArcSwap`; mutations validate
/// against the current snapshot, build the next one, publish it wholesale,
/// and then notify subscribers. A failed validation leaves the published
/// snapshot untouched.
pub struct ChatStore {
    state: ArcSwap<ChatState>,
    // Serializes read-modify-write cycles so subscribers never observe a
    // partially-applied state. Readers do not take this lock.
    write_guard: Mutex<()>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

impl ChatStore {
    pub fn new(initial: InitialState) -> StoreResult<Self> {
        let state = initial.build()?;
        Ok(Self {
            state: ArcSwap::from_pointee(state),
            write_guard: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        })
    }

    /// Current snapshot. Strictly increasing across mutations; treat as
    /// immutable.
    pub fn snapshot(&self) -> Arc<ChatState> {
        self.state.load_full()
    }

    /// Appends a message from the current sender. Blank content is rejected
    /// and the transcript stays unchanged.
    pub fn send_message(&self, content: &str) -> StoreResult<MessageId> {
        let trimmed = content.trim();
        ensure!(!trimmed.is_empty(), EmptyMessageSnafu);

        let _write = self.lock_writes();
        let current = self.state.load_full();
        let message = Message {
            id: MessageId::new_v7(),
            sender_id: current.current_sender_id.clone(),
            content: trimmed.to_string(),
            sent_at_unix_seconds: current_unix_timestamp_seconds(),
        };
        let id = message.id;
        let mut next = (*current).clone();
        next.messages.push(message);
        self.publish(next, ChatEvent::MessageAdded { id });
        Ok(id)
    }

    /// Switches who the admin is impersonating. Never touches the viewer.
    pub fn set_current_sender(&self, member_id: &MemberId) -> StoreResult<()> {
        let _write = self.lock_writes();
        let current = self.state.load_full();
        ensure!(
            current.has_member(member_id),
            UnknownMemberSnafu {
                stage: "set-current-sender",
                member_id: member_id.to_string(),
            }
        );
        if current.current_sender_id == *member_id {
            return Ok(());
        }
        let mut next = (*current).clone();
        next.current_sender_id = member_id.clone();
        self.publish(next, ChatEvent::SenderChanged);
        Ok(())
    }

    /// Switches whose point of view the chat renders from. Never touches the
    /// sender.
    pub fn set_current_viewer(&self, member_id: &MemberId) -> StoreResult<()> {
        let _write = self.lock_writes();
        let current = self.state.load_full();
        ensure!(
            current.has_member(member_id),
            UnknownMemberSnafu {
                stage: "set-current-viewer",
                member_id: member_id.to_string(),
            }
        );
        if current.current_viewer_id == *member_id {
            return Ok(());
        }
        let mut next = (*current).clone();
        next.current_viewer_id = member_id.clone();
        self.publish(next, ChatEvent::ViewerChanged);
        Ok(())
    }

    /// The enum argument makes unrecognized themes unrepresentable here; the
    /// string boundary is `BubbleTheme::from_str`.
    pub fn set_theme(&self, theme: BubbleTheme) -> StoreResult<()> {
        let _write = self.lock_writes();
        let current = self.state.load_full();
        if current.bubble_theme == theme {
            return Ok(());
        }
        let mut next = (*current).clone();
        next.bubble_theme = theme;
        self.publish(next, ChatEvent::ThemeChanged);
        Ok(())
    }

    pub fn set_group_name(&self, name: &str) -> StoreResult<()> {
        let trimmed = name.trim();
        ensure!(!trimmed.is_empty(), EmptyGroupNameSnafu);

        let _write = self.lock_writes();
        let current = self.state.load_full();
        if current.group_name == trimmed {
            return Ok(());
        }
        let mut next = (*current).clone();
        next.group_name = trimmed.to_string();
        self.publish(next, ChatEvent::GroupRenamed);
        Ok(())
    }

    /// Wholesale background replacement after validation (stop floor, opacity
    /// and position ranges).
    pub fn set_background(&self, background: BackgroundSettings) -> StoreResult<()> {
        background.validate()?;

        let _write = self.lock_writes();
        let current = self.state.load_full();
        if current.background == background {
            return Ok(());
        }
        let mut next = (*current).clone();
        next.background = background;
        self.publish(next, ChatEvent::BackgroundChanged);
        Ok(())
    }

    /// Registers a callback invoked after every published snapshot.
    pub fn subscribe(
        &self,
        callback: impl Fn(&ChatEvent, &Arc<ChatState>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().push((id, Box::new(callback)));
        id
    }

    /// Returns whether the subscription was still attached.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() < before
    }

    fn publish(&self, next: ChatState, event: ChatEvent) {
        let snapshot = Arc::new(next);
        self.state.store(Arc::clone(&snapshot));
        tracing::debug!(?event, "published chat snapshot");
        for (_, subscriber) in self.lock_subscribers().iter() {
            subscriber(&event, &snapshot);
        }
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Subscriber)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn current_unix_timestamp_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::ChatStoreError;
    use crate::types::{GradientKind, GradientStop, HexColor};

    fn store() -> ChatStore {
        ChatStore::new(InitialState::default()).unwrap()
    }

    fn member(raw: &str) -> MemberId {
        raw.parse().unwrap()
    }

    #[test]
    fn send_message_appends_with_the_current_sender() {
        let store = store();
        let id = store.send_message("  hi  ").unwrap();
        let state = store.snapshot();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].id, id);
        assert_eq!(state.messages[0].content, "hi");
        assert_eq!(state.messages[0].sender_id, state.current_sender_id);
    }

    #[test]
    fn blank_messages_are_rejected_without_state_change() {
        let store = store();
        assert!(matches!(
            store.send_message(""),
            Err(ChatStoreError::EmptyMessage)
        ));
        assert!(matches!(
            store.send_message("   "),
            Err(ChatStoreError::EmptyMessage)
        ));
        assert!(store.snapshot().messages.is_empty());
    }

    #[test]
    fn n_sends_yield_n_messages_in_call_order() {
        let store = store();
        for index in 0..5 {
            store.send_message(&format!("message {index}")).unwrap();
        }
        let state = store.snapshot();
        assert_eq!(state.messages.len(), 5);
        for (index, message) in state.messages.iter().enumerate() {
            assert_eq!(message.content, format!("message {index}"));
        }
    }

    #[test]
    fn set_sender_accepts_every_roster_member() {
        let store = store();
        let roster = store.snapshot().members.clone();
        for entry in &roster {
            store.set_current_sender(&entry.id).unwrap();
            assert_eq!(store.snapshot().current_sender_id, entry.id);
        }
    }

    #[test]
    fn unknown_member_ids_leave_state_unchanged() {
        let store = store();
        let before = store.snapshot();
        let stranger = member("nobody");
        assert!(matches!(
            store.set_current_sender(&stranger),
            Err(ChatStoreError::UnknownMember { .. })
        ));
        assert!(matches!(
            store.set_current_viewer(&stranger),
            Err(ChatStoreError::UnknownMember { .. })
        ));
        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn sender_and_viewer_are_independent() {
        let store = store();
        store.set_current_viewer(&member("sandani")).unwrap();
        let state = store.snapshot();
        assert_eq!(state.current_sender_id, member("imandi"));
        assert_eq!(state.current_viewer_id, member("sandani"));

        store.set_current_sender(&member("sachintha")).unwrap();
        let state = store.snapshot();
        assert_eq!(state.current_sender_id, member("sachintha"));
        assert_eq!(state.current_viewer_id, member("sandani"));
    }

    #[test]
    fn viewer_switch_reclassifies_message_ownership() {
        let store = store();
        store.set_current_sender(&member("sandani")).unwrap();
        store.send_message("hello").unwrap();

        let state = store.snapshot();
        assert!(!state.is_own_message(&state.messages[0]));

        store.set_current_viewer(&member("sandani")).unwrap();
        let state = store.snapshot();
        assert!(state.is_own_message(&state.messages[0]));
    }

    #[test]
    fn group_name_is_trimmed_and_blank_names_rejected() {
        let store = store();
        store.set_group_name("  Weekend Plans  ").unwrap();
        assert_eq!(store.snapshot().group_name, "Weekend Plans");
        assert!(matches!(
            store.set_group_name("   "),
            Err(ChatStoreError::EmptyGroupName)
        ));
        assert_eq!(store.snapshot().group_name, "Weekend Plans");
    }

    #[test]
    fn invalid_backgrounds_are_rejected_wholesale() {
        let store = store();
        let before = store.snapshot();
        let single_stop = BackgroundSettings::Gradient {
            kind: GradientKind::Radial,
            direction: String::new(),
            stops: vec![GradientStop::new(HexColor::from_static("#ffffff"), 1.0, 0.0)],
        };
        assert!(store.set_background(single_stop).is_err());

        let overdriven = BackgroundSettings::Solid {
            color: HexColor::from_static("#ffffff"),
            opacity: 2.0,
        };
        assert!(store.set_background(overdriven).is_err());
        assert_eq!(store.snapshot().background, before.background);
    }

    #[test]
    fn valid_background_replaces_the_previous_one() {
        let store = store();
        let solid = BackgroundSettings::Solid {
            color: HexColor::from_static("#22c55e"),
            opacity: 0.5,
        };
        store.set_background(solid.clone()).unwrap();
        assert_eq!(store.snapshot().background, solid);
    }

    #[test]
    fn subscribers_see_events_and_full_snapshots() {
        let store = Arc::new(store());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |event, snapshot| {
            sink.lock()
                .unwrap()
                .push((event.clone(), snapshot.messages.len()));
        });

        store.send_message("one").unwrap();
        store.set_current_viewer(&member("sandani")).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0].0, ChatEvent::MessageAdded { .. }));
        assert_eq!(seen[0].1, 1);
        assert_eq!(seen[1].0, ChatEvent::ViewerChanged);
    }

    #[test]
    fn unsubscribe_detaches_the_callback() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.send_message("one").unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.send_message("two").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_op_transitions_do_not_notify() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set_current_sender(&member("imandi")).unwrap();
        store.set_theme(BubbleTheme::Rose).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.set_theme(BubbleTheme::Dark).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().bubble_theme, BubbleTheme::Dark);
    }

    #[test]
    fn end_to_end_admin_scenario() {
        let store = store();
        let state = store.snapshot();
        assert_eq!(state.members.len(), 3);
        assert!(state.messages.is_empty());
        assert_eq!(state.bubble_theme, BubbleTheme::Rose);
        assert_eq!(state.current_sender_id, member("imandi"));
        assert_eq!(state.current_viewer_id, member("imandi"));

        store.set_current_sender(&member("sandani")).unwrap();
        store.send_message("hello").unwrap();
        store.set_current_viewer(&member("sandani")).unwrap();

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender_id, member("sandani"));
        assert_eq!(state.messages[0].content, "hello");
        assert!(state.is_own_message(&state.messages[0]));
    }
}
