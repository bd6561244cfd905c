//! Chapter metadata for clip concatenation.
//!
//! Given an ordered clip list, durations are probed and accumulated into
//! contiguous chapters; rendering emits ffmetadata text based on the first
//! clip's global metadata.

use crate::error::{CoreError, CoreResult};
use crate::external::MediaBackend;

use std::path::{Path, PathBuf};

/// One chapter with float-second bounds (not truncated).
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub title: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Ordered chapters plus the base container metadata they extend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterList {
    pub base_metadata: String,
    pub chapters: Vec<Chapter>,
}

impl ChapterList {
    /// Renders ffmetadata text. Fractional seconds survive through the
    /// millisecond timebase.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let base = self.base_metadata.trim_end();
        if base.is_empty() {
            out.push_str(";FFMETADATA1");
        } else {
            out.push_str(base);
        }
        out.push('\n');

        for chapter in &self.chapters {
            out.push_str("[CHAPTER]\n");
            out.push_str("TIMEBASE=1/1000\n");
            out.push_str(&format!("START={}\n", millis(chapter.start_secs)));
            out.push_str(&format!("END={}\n", millis(chapter.end_secs)));
            out.push_str(&format!("title={}\n", escape_metadata(&chapter.title)));
        }
        out
    }
}

/// Builds chapters for an ordered clip list. An empty list is a fatal
/// input error.
pub fn build_chapters(backend: &dyn MediaBackend, clips: &[PathBuf]) -> CoreResult<ChapterList> {
    if clips.is_empty() {
        return Err(CoreError::InvalidInput("clip list is empty".to_string()));
    }

    let base_metadata = backend.read_global_metadata(&clips[0])?;

    let mut chapters = Vec::with_capacity(clips.len());
    let mut running_total = 0.0_f64;
    for clip in clips {
        let duration = backend.probe_duration(clip)?;
        chapters.push(Chapter {
            title: clip_title(clip),
            start_secs: running_total,
            end_secs: running_total + duration,
        });
        running_total += duration;
    }

    Ok(ChapterList {
        base_metadata,
        chapters,
    })
}

/// Filename with the extension stripped.
fn clip_title(clip: &Path) -> String {
    clip.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| clip.to_string_lossy().into_owned())
}

fn millis(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

/// Escapes the characters the ffmetadata format treats specially.
pub(crate) fn escape_metadata(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '=' | ';' | '#' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockBackend;

    #[test]
    fn test_single_clip_chapter_bounds() {
        let backend = MockBackend::new().with_duration("intro.mkv", 60.0);
        let list = build_chapters(&backend, &[PathBuf::from("intro.mkv")]).unwrap();

        assert_eq!(list.chapters.len(), 1);
        let ch = &list.chapters[0];
        assert_eq!(ch.start_secs, 0.0);
        assert_eq!(ch.end_secs, 60.0);
        assert_eq!(ch.title, "intro");
    }

    #[test]
    fn test_durations_accumulate_with_fractions() {
        let backend = MockBackend::new()
            .with_duration("a.mp4", 12.5)
            .with_duration("b.mp4", 7.25)
            .with_duration("c.mp4", 100.0);
        let clips = [
            PathBuf::from("a.mp4"),
            PathBuf::from("b.mp4"),
            PathBuf::from("c.mp4"),
        ];
        let list = build_chapters(&backend, &clips).unwrap();

        assert_eq!(list.chapters[0].start_secs, 0.0);
        assert_eq!(list.chapters[0].end_secs, 12.5);
        assert_eq!(list.chapters[1].start_secs, 12.5);
        assert_eq!(list.chapters[1].end_secs, 19.75);
        assert_eq!(list.chapters[2].start_secs, 19.75);
        assert_eq!(list.chapters[2].end_secs, 119.75);
    }

    #[test]
    fn test_empty_clip_list_is_fatal() {
        let backend = MockBackend::new();
        assert!(matches!(
            build_chapters(&backend, &[]),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_emits_ffmetadata() {
        let list = ChapterList {
            base_metadata: ";FFMETADATA1\ntitle=Collection\n".to_string(),
            chapters: vec![Chapter {
                title: "part one".to_string(),
                start_secs: 0.0,
                end_secs: 60.0,
            }],
        };
        let text = list.render();
        assert!(text.starts_with(";FFMETADATA1\ntitle=Collection\n"));
        assert!(text.contains("[CHAPTER]\nTIMEBASE=1/1000\nSTART=0\nEND=60000\ntitle=part one\n"));
    }

    #[test]
    fn test_render_preserves_fractional_seconds() {
        let list = ChapterList {
            base_metadata: String::new(),
            chapters: vec![Chapter {
                title: "clip".to_string(),
                start_secs: 12.5,
                end_secs: 19.75,
            }],
        };
        let text = list.render();
        assert!(text.contains("START=12500\n"));
        assert!(text.contains("END=19750\n"));
    }

    #[test]
    fn test_title_escaping() {
        assert_eq!(escape_metadata("plain title"), "plain title");
        assert_eq!(escape_metadata("a=b;c#d"), "a\\=b\\;c\\#d");
        assert_eq!(escape_metadata("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_first_clip_metadata_is_base() {
        let backend = MockBackend::new()
            .with_metadata(";FFMETADATA1\nartist=someone\n")
            .with_duration("a.mp4", 1.0);
        let list = build_chapters(&backend, &[PathBuf::from("a.mp4")]).unwrap();
        assert!(list.render().starts_with(";FFMETADATA1\nartist=someone\n[CHAPTER]"));
    }
}
