use tokio::sync::broadcast;

use crate::{config::defaults::STATE_CHANGE_CHANNEL_CAPACITY, models::Address};

/// Upstream state changes the avatar cache reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// System contacts changed; any contact's content may differ
    ContactsChanged,
    /// One contact's profile (photo, name, theme) changed
    ProfileChanged(Address),
    /// The local user's profile changed
    LocalProfileChanged,
    /// App theme changed
    ThemeChanged,
}

/// Create the broadcast channel state changes are published on
pub fn create_state_change_channel() -> (broadcast::Sender<StateChange>, broadcast::Receiver<StateChange>) {
    broadcast::channel(STATE_CHANGE_CHANNEL_CAPACITY)
}
