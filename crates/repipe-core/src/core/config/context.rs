use std::sync::Arc;

use crate::config::{Config, GlobalOptions};
use crate::effects::{Effects, SharedEffects, SystemEffects};
use crate::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

pub struct CommandContext {
    effects: SharedEffects,
}

impl CommandContext {
    /// Creates a context wired to the real pip and filesystem.
    #[must_use]
    pub fn new(global: &GlobalOptions) -> Self {
        let config = Config::from_env(global);
        Self::with_effects(Arc::new(SystemEffects::new(config.pip().clone())))
    }

    /// Creates a context around caller-provided effects.
    #[must_use]
    pub fn with_effects(effects: SharedEffects) -> Self {
        Self { effects }
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }
}
