//! Static configuration for the rotation automation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::entities::MemberHandle;
use crate::domain::errors::ConfigError;

/// Automation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotaConfig {
    /// The automation's own chat handle. Excluded from every resolved
    /// roster so the bot never schedules itself.
    pub own_handle: MemberHandle,
    /// Display name used in outbound messages.
    pub display_name: String,
    /// Skip the daily pass on Saturdays and Sundays.
    pub skip_weekends: bool,
    /// First day of some past sprint. When set, the daily pass is skipped
    /// on each fortnightly sprint boundary (sprint planning day).
    pub sprint_anchor: Option<NaiveDate>,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            own_handle: MemberHandle::new("UROTA0000"),
            display_name: "Rota".to_owned(),
            skip_weekends: true,
            sprint_anchor: None,
        }
    }
}

impl RotaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.own_handle.is_empty() {
            return Err(ConfigError::EmptyHandle);
        }
        if self.display_name.is_empty() {
            return Err(ConfigError::EmptyDisplayName);
        }
        Ok(())
    }
}
