use serde::Serialize;

/// What the hero area should currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum PlaybackState {
    Source(String),
    Fallback(String),
    Unavailable,
}

/// Ordered video sources with image fallback. Each load error moves to the
/// next source; after the last one the fallback image (if any) is shown.
#[derive(Debug, Clone)]
pub struct VideoPlayback {
    sources: Vec<String>,
    fallback_image: Option<String>,
    cursor: usize,
}

impl VideoPlayback {
    pub fn new(sources: Vec<String>, fallback_image: Option<String>) -> Self {
        Self {
            sources,
            fallback_image,
            cursor: 0,
        }
    }

    pub fn current(&self) -> PlaybackState {
        match self.sources.get(self.cursor) {
            Some(src) => PlaybackState::Source(src.clone()),
            None => match &self.fallback_image {
                Some(image) => PlaybackState::Fallback(image.clone()),
                None => PlaybackState::Unavailable,
            },
        }
    }

    /// Record a load failure for the current source and return what to show next.
    pub fn on_error(&mut self) -> PlaybackState {
        if self.cursor < self.sources.len() {
            if let Some(failed) = self.sources.get(self.cursor) {
                log::warn!("Video source failed to load: {}", failed);
            }
            self.cursor += 1;
        }
        let next = self.current();
        if !matches!(next, PlaybackState::Source(_)) {
            log::warn!("All video sources failed, falling back to background image");
        }
        next
    }

    /// Skip straight to the first source known to work, e.g. after verification.
    pub fn prefer(&mut self, source: &str) -> bool {
        match self.sources.iter().position(|s| s == source) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playback(fallback: Option<&str>) -> VideoPlayback {
        VideoPlayback::new(
            vec!["/videos/a.mp4".to_string(), "/videos/b.mp4".to_string()],
            fallback.map(String::from),
        )
    }

    #[test]
    fn test_errors_walk_sources_then_fallback() {
        let mut p = playback(Some("/images/hero.jpg"));
        assert_eq!(p.current(), PlaybackState::Source("/videos/a.mp4".into()));
        assert_eq!(p.on_error(), PlaybackState::Source("/videos/b.mp4".into()));
        assert_eq!(p.on_error(), PlaybackState::Fallback("/images/hero.jpg".into()));
        assert!(p.is_exhausted());
        assert_eq!(p.on_error(), PlaybackState::Fallback("/images/hero.jpg".into()));
    }

    #[test]
    fn test_no_fallback_is_unavailable() {
        let mut p = playback(None);
        p.on_error();
        assert_eq!(p.on_error(), PlaybackState::Unavailable);
        assert_eq!(VideoPlayback::new(Vec::new(), None).current(), PlaybackState::Unavailable);
    }

    #[test]
    fn test_prefer_known_good_source() {
        let mut p = playback(None);
        assert!(p.prefer("/videos/b.mp4"));
        assert_eq!(p.current(), PlaybackState::Source("/videos/b.mp4".into()));
        assert!(!p.prefer("/videos/zzz.mp4"));
    }
}
