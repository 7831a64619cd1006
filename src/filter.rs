//! The emit decision. Policy lives outside the router; this is the hook it calls.

use crate::level::Level;
use std::collections::HashMap;

/// Decides whether a record on `channel` at `level` is emitted at all.
pub trait EmitFilter: Send + Sync {
    fn should_emit(&self, channel: &str, level: Level) -> bool;
}

impl<F> EmitFilter for F
where
    F: Fn(&str, Level) -> bool + Send + Sync,
{
    fn should_emit(&self, channel: &str, level: Level) -> bool {
        self(channel, level)
    }
}

/// Per-channel on/off switch and minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSetting {
    pub enabled: bool,
    pub min_level: Level,
}

impl Default for ChannelSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            min_level: Level::Debug,
        }
    }
}

/// Settings-driven filter. A channel uses the setting of its nearest
/// configured ancestor (`app.http` falls back to `app`); unconfigured
/// hierarchies use the fallback, which lets everything through.
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    settings: HashMap<String, ChannelSetting>,
    fallback: ChannelSetting,
}

impl ChannelFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn channel(mut self, name: impl Into<String>, setting: ChannelSetting) -> Self {
        self.settings.insert(name.into(), setting);
        self
    }

    #[must_use]
    pub fn disable(self, name: impl Into<String>) -> Self {
        self.channel(
            name,
            ChannelSetting {
                enabled: false,
                min_level: Level::Debug,
            },
        )
    }

    #[must_use]
    pub fn min_level(self, name: impl Into<String>, level: Level) -> Self {
        self.channel(
            name,
            ChannelSetting {
                enabled: true,
                min_level: level,
            },
        )
    }

    #[must_use]
    pub const fn fallback(mut self, setting: ChannelSetting) -> Self {
        self.fallback = setting;
        self
    }

    /// Effective setting for `channel`.
    #[must_use]
    pub fn setting(&self, channel: &str) -> ChannelSetting {
        let mut prefix = channel;
        loop {
            if let Some(setting) = self.settings.get(prefix) {
                return *setting;
            }
            match prefix.rfind('.') {
                Some(idx) => prefix = &prefix[..idx],
                None => return self.fallback,
            }
        }
    }
}

impl EmitFilter for ChannelFilter {
    fn should_emit(&self, channel: &str, level: Level) -> bool {
        let setting = self.setting(channel);
        setting.enabled && level >= setting.min_level
    }
}
