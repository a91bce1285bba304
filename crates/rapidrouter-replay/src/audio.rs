//! Audio backends for the replay player

use rapidrouter_animation::{Audio, AudioError, SoundCue};

/// Logs cues instead of playing them
#[derive(Debug, Default)]
pub struct SilentAudio {
    muted: bool,
    pub played: Vec<SoundCue>,
}

impl Audio for SilentAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if !self.muted {
            tracing::debug!("♪ {}", cue.file_stem());
        }
        self.played.push(cue);
        Ok(())
    }

    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        tracing::debug!("♪ stop {}", cue.file_stem());
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(feature = "rodio")]
pub use device::DeviceAudio;

#[cfg(feature = "rodio")]
mod device {
    //! Sound cues played through rodio from `<sound_dir>/<cue>.mp3` (or `.ogg`)

    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{Audio, AudioError, SoundCue};

    const EXTENSIONS: [&str; 2] = ["mp3", "ogg"];

    pub struct DeviceAudio {
        /// rodio output stream (must be kept alive)
        _stream: OutputStream,
        handle: OutputStreamHandle,
        dir: PathBuf,
        /// One-shot cues, kept alive until finished
        sfx_sinks: Vec<(SoundCue, Sink)>,
        /// The engine loop
        loop_sink: Option<Sink>,
        muted: bool,
    }

    impl DeviceAudio {
        pub fn new(dir: PathBuf) -> Result<Self, AudioError> {
            let (stream, handle) = OutputStream::try_default().map_err(|e| {
                tracing::warn!("Failed to initialize audio: {}", e);
                AudioError::NoDevice
            })?;
            tracing::info!("Audio output initialized, sounds from {}", dir.display());
            Ok(Self {
                _stream: stream,
                handle,
                dir,
                sfx_sinks: Vec::new(),
                loop_sink: None,
                muted: false,
            })
        }

        fn open(&self, cue: SoundCue) -> Result<Decoder<BufReader<File>>, AudioError> {
            let stem = cue.file_stem();
            let path = EXTENSIONS
                .iter()
                .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
                .find(|p| p.is_file())
                .ok_or_else(|| AudioError::Load(stem, "no mp3 or ogg file".to_string()))?;
            let file = File::open(&path).map_err(|e| AudioError::Load(stem, e.to_string()))?;
            Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Load(stem, e.to_string()))
        }

        fn volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                1.0
            }
        }

        /// Drop finished one-shot sinks
        fn gc(&mut self) {
            self.sfx_sinks.retain(|(_, s)| !s.empty());
        }
    }

    impl Audio for DeviceAudio {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            self.gc();
            let source = self.open(cue)?;
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| AudioError::Load(cue.file_stem(), e.to_string()))?;
            sink.set_volume(self.volume());

            if cue.looping() {
                sink.append(source.repeat_infinite());
                if let Some(old) = self.loop_sink.replace(sink) {
                    old.stop();
                }
            } else {
                sink.append(source);
                self.sfx_sinks.push((cue, sink));
            }
            Ok(())
        }

        fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            if cue.looping() {
                if let Some(sink) = self.loop_sink.take() {
                    sink.stop();
                }
            } else {
                for (_, sink) in self.sfx_sinks.iter().filter(|(c, _)| *c == cue) {
                    sink.stop();
                }
                self.gc();
            }
            Ok(())
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            let volume = self.volume();
            for (_, sink) in &self.sfx_sinks {
                sink.set_volume(volume);
            }
            if let Some(sink) = &self.loop_sink {
                sink.set_volume(volume);
            }
        }
    }
}
