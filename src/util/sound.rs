//! Audible notifications.

#[cfg(test)]
#[path = "sound_test.rs"]
mod sound_test;

/// Sounds the relay view can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    /// Repeated synchronization failure.
    Error,
}

impl Sound {
    #[must_use]
    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Error => "/assets/sound/error.mp3",
        }
    }
}

/// Plays notification sounds.
pub trait SoundPlayer {
    fn play(&self, sound: Sound);
}

/// `HtmlAudioElement` backed player. Silent outside `hydrate` builds.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSound;

impl SoundPlayer for BrowserSound {
    fn play(&self, sound: Sound) {
        #[cfg(feature = "hydrate")]
        {
            // Autoplay policies may reject playback; nothing to recover.
            if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(sound.asset_path()) {
                let _ = audio.play();
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = sound;
        }
    }
}
