use serde::{Deserialize, Serialize};

use crate::prefs::repo::UserPrefs;

#[derive(Debug, Serialize)]
pub struct PrefsOut {
    pub sleep_minutes: i32,
}

impl From<UserPrefs> for PrefsOut {
    fn from(p: UserPrefs) -> Self {
        Self {
            sleep_minutes: p.sleep_minutes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrefsUpdate {
    pub sleep_minutes: i32,
}
