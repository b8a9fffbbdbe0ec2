//! Volatile state of one connection.

/// What the bot knows about itself on the current connection.
///
/// Rebuilt in place on every fresh connection; the durable stores and the
/// command registry live elsewhere and survive it.
#[derive(Debug, Clone)]
pub struct SessionState {
    nickname: String,
    channels: Vec<String>,
    nickname_retries: u32,
    alive: bool,
}

impl SessionState {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            channels: Vec::new(),
            nickname_retries: 0,
            alive: false,
        }
    }

    /// Back to the state of a fresh connection under `nickname`.
    pub fn reset(&mut self, nickname: impl Into<String>) {
        *self = Self::new(nickname);
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Whether `target` names us.
    pub fn is_self(&self, target: &str) -> bool {
        self.nickname.eq_ignore_ascii_case(target)
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn is_joined(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }

    /// Record membership. Returns `false` if already a member.
    pub fn add_channel(&mut self, channel: &str) -> bool {
        if self.is_joined(channel) {
            return false;
        }
        self.channels.push(channel.to_string());
        true
    }

    /// Forget membership. Returns `false` if we were not a member.
    pub fn remove_channel(&mut self, channel: &str) -> bool {
        let before = self.channels.len();
        self.channels.retain(|c| c != channel);
        self.channels.len() != before
    }

    pub fn take_channels(&mut self) -> Vec<String> {
        std::mem::take(&mut self.channels)
    }

    pub fn nickname_retries(&self) -> u32 {
        self.nickname_retries
    }

    /// Pick the next fallback nickname after a collision and adopt it.
    ///
    /// The first collision yields `alt` itself, later ones `alt1`, `alt2`, ...
    pub fn next_alt_nickname(&mut self, alt: &str) -> String {
        let nick = match self.nickname_retries {
            0 => alt.to_string(),
            n => format!("{alt}{n}"),
        };
        self.nickname_retries += 1;
        self.nickname = nick.clone();
        nick
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_set_has_no_duplicates() {
        let mut state = SessionState::new("snek");
        assert!(state.add_channel("#a"));
        assert!(!state.add_channel("#a"));
        assert!(state.add_channel("#b"));
        assert_eq!(state.channels(), ["#a", "#b"]);

        assert!(state.remove_channel("#a"));
        assert!(!state.remove_channel("#a"));
        assert_eq!(state.take_channels(), vec!["#b".to_string()]);
        assert!(state.channels().is_empty());
    }

    #[test]
    fn alt_nicknames_count_up_until_reset() {
        let mut state = SessionState::new("snek");
        assert_eq!(state.next_alt_nickname("snek_"), "snek_");
        assert_eq!(state.next_alt_nickname("snek_"), "snek_1");
        assert_eq!(state.next_alt_nickname("snek_"), "snek_2");
        assert_eq!(state.nickname(), "snek_2");
        assert_eq!(state.nickname_retries(), 3);

        state.add_channel("#a");
        state.set_alive(true);
        state.reset("snek");
        assert_eq!(state.nickname(), "snek");
        assert_eq!(state.nickname_retries(), 0);
        assert!(state.channels().is_empty());
        assert!(!state.is_alive());
        assert_eq!(state.next_alt_nickname("snek_"), "snek_");
    }

    #[test]
    fn self_match_ignores_case() {
        let state = SessionState::new("SnekBot");
        assert!(state.is_self("snekbot"));
        assert!(!state.is_self("#snekbot"));
    }
}
