//! Voice selection from script text.
//!
//! This is a glyph heuristic, not language identification: a script that
//! contains any of a handful of common Chinese characters gets the secondary
//! voice. Mixed-language or very short scripts may pick the wrong voice.

/// Characters that switch the script to the secondary-language voice.
pub const SECONDARY_LANGUAGE_GLYPHS: &[char] = &['你', '好', '吗', '谢', '再', '见'];

/// Whether the script contains any secondary-language glyph.
pub fn uses_secondary_language(script: &str) -> bool {
    script.chars().any(|c| SECONDARY_LANGUAGE_GLYPHS.contains(&c))
}

/// Voice identifiers used for generated videos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Voice for scripts without secondary-language glyphs
    pub default_voice_id: String,
    /// Voice for scripts with secondary-language glyphs
    pub secondary_voice_id: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_voice_id: "2d5b0e6cf36f460aa7fc47e3eee4ba54".to_string(),
            secondary_voice_id: "b8e9d294b1d54b3daa0e7d3c4a3a2c7a".to_string(),
        }
    }
}

impl VoiceConfig {
    /// Pick the voice for a script.
    pub fn select(&self, script: &str) -> &str {
        if uses_secondary_language(script) {
            &self.secondary_voice_id
        } else {
            &self.default_voice_id
        }
    }
}
