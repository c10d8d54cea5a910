//! Player preferences
//!
//! Held in memory for the page's lifetime only; nothing is stored between visits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            show_fps: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Gain applied to every effect, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if !self.sound_enabled {
            return 0.0;
        }
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        log::info!("Sound {}", if self.sound_enabled { "on" } else { "off" });
        self.sound_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_volume_is_zero() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamped() {
        let settings = Settings {
            master_volume: 2.0,
            sfx_volume: 1.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 1.0);
    }
}
