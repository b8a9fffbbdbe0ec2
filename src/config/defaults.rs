//! Default value functions for configuration.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_settle_delay_ms() -> u64 {
    2000
}

pub fn default_reconnect_delay_secs() -> u64 {
    5
}

// =============================================================================
// Command Defaults
// =============================================================================

pub fn default_command_prefix() -> String {
    "!".to_string()
}

pub fn default_repeat_token() -> String {
    "2".to_string()
}

// =============================================================================
// Services Defaults
// =============================================================================

pub fn default_nickserv() -> String {
    "NickServ".to_string()
}

pub fn default_identify_trigger() -> String {
    "This nickname is registered".to_string()
}

pub fn default_identified_marker() -> String {
    "You are now identified".to_string()
}

// =============================================================================
// Storage Defaults
// =============================================================================

pub fn default_database_path() -> String {
    "snekbot.db".to_string()
}

pub fn default_quit_message() -> String {
    "brb!".to_string()
}
