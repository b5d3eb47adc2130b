//! Audio seam.
//!
//! The game only ever needs four things from a sound backend: start the
//! background track, pause it, stop-and-rewind it, and fire a one-shot
//! effect.  Backends report failures as `io::Error`; the controller logs
//! them and keeps playing.  Music goes through rodio when an output device
//! is available.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A bullet left the muzzle
    Shot,
}

pub trait AudioSink {
    /// Start or continue the background track from its current position.
    fn play_music(&mut self, track: Option<&str>) -> io::Result<()>;
    fn pause_music(&mut self) -> io::Result<()>;
    /// Pause and rewind to the beginning.
    fn stop_music(&mut self) -> io::Result<()>;
    fn play_effect(&mut self, effect: SoundEffect) -> io::Result<()>;
}

/// Produces no sound.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_music(&mut self, _track: Option<&str>) -> io::Result<()> {
        Ok(())
    }

    fn pause_music(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn stop_music(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn play_effect(&mut self, _effect: SoundEffect) -> io::Result<()> {
        Ok(())
    }
}

/// Decode a track from disk.
pub fn open_track(path: &Path) -> io::Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    Decoder::new(BufReader::new(file)).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {e}", path.display()),
        )
    })
}

/// Background track on the default output device.
///
/// Pausing keeps the position; stopping drops the decoded source so the next
/// `play` starts from the top.
pub struct MusicPlayer {
    _stream: OutputStream,
    sink: Sink,
    loaded: Option<String>,
}

impl MusicPlayer {
    pub fn open_default() -> io::Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        sink.pause();
        Ok(Self {
            _stream: stream,
            sink,
            loaded: None,
        })
    }

    pub fn play(&mut self, track: &str) -> io::Result<()> {
        if self.loaded.as_deref() != Some(track) || self.sink.empty() {
            self.sink.stop();
            self.loaded = None;
            let source = open_track(Path::new(track))?;
            self.sink.append(source);
            self.loaded = Some(track.to_string());
        }
        self.sink.play();
        Ok(())
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn stop(&mut self) {
        self.sink.stop();
        self.loaded = None;
    }
}

/// Terminal backend: rings the bell for effects and drives the background
/// track through an optional [`MusicPlayer`].
pub struct TerminalAudio<W: Write> {
    out: W,
    bell: bool,
    music: Option<MusicPlayer>,
    current: Option<String>,
    playing: bool,
}

impl<W: Write> TerminalAudio<W> {
    pub fn new(out: W, bell: bool) -> Self {
        Self {
            out,
            bell,
            music: None,
            current: None,
            playing: false,
        }
    }

    pub fn with_music(mut self, music: MusicPlayer) -> Self {
        self.music = Some(music);
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Track that `play_music` would resume.
    pub fn current_track(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> AudioSink for TerminalAudio<W> {
    fn play_music(&mut self, track: Option<&str>) -> io::Result<()> {
        if let Some(t) = track {
            if self.current.as_deref() != Some(t) {
                log::info!("Background track: {t}");
                self.current = Some(t.to_string());
            }
        }
        let Some(current) = self.current.as_deref() else {
            self.playing = false;
            return Ok(());
        };
        if let Some(music) = self.music.as_mut() {
            music.play(current)?;
        }
        self.playing = true;
        Ok(())
    }

    fn pause_music(&mut self) -> io::Result<()> {
        if let Some(music) = &self.music {
            music.pause();
        }
        self.playing = false;
        Ok(())
    }

    fn stop_music(&mut self) -> io::Result<()> {
        if let Some(music) = self.music.as_mut() {
            music.stop();
        }
        if self.playing {
            log::debug!("Background track stopped");
        }
        self.playing = false;
        Ok(())
    }

    fn play_effect(&mut self, effect: SoundEffect) -> io::Result<()> {
        if !self.bell {
            return Ok(());
        }
        match effect {
            SoundEffect::Shot => self.out.write_all(b"\x07")?,
        }
        self.out.flush()
    }
}
