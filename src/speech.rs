//! Speech and sound cues
//!
//! The quiz never waits on audio. [`FestivalSpeaker`] queues every request
//! onto one worker thread so utterances play in order without overlapping;
//! [`SilentSpeaker`] only logs.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::Word;

// ==================== Voice / Cue ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    #[default]
    American,
    NewZealand,
}

impl Voice {
    /// Festival command selecting the voice
    pub fn festival_command(self) -> &'static str {
        match self {
            Voice::American => "(voice_kal_diphone)",
            Voice::NewZealand => "(voice_akl_nz_jdt_diphone)",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Voice::American => "american",
            Voice::NewZealand => "new_zealand",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice: {0} (expected american or new_zealand)")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "american" | "us" => Ok(Voice::American),
            "new_zealand" | "newzealand" | "nz" => Ok(Voice::NewZealand),
            _ => Err(UnknownVoice(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
}

impl Cue {
    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Correct => "Quiz_SoundEffect_CorrectAnswer.mp3",
            Cue::Incorrect => "Quiz_SoundEffect_WrongAnswer.mp3",
        }
    }
}

// ==================== Config ====================

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    pub voice: Voice,
    /// Festival duration stretch used for retries and relistening
    pub slow_stretch: f32,
    /// Folder holding the cue sound files
    pub sound_dir: PathBuf,
    pub festival_bin: String,
    pub player_bin: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: Voice::American,
            slow_stretch: 1.8,
            sound_dir: PathBuf::from("./.soundFX"),
            festival_bin: "festival".to_string(),
            player_bin: "mpg123".to_string(),
        }
    }
}

// ==================== Speaker ====================

/// Audio side of the quiz. Implementations must return immediately.
pub trait Speaker: Send + Sync {
    /// Ask the learner to spell a word
    fn speak_word(&self, word: &Word);

    /// Repeat a word after a wrong first attempt
    fn speak_retry(&self, word: &Word);

    /// Say the word again, slowly
    fn relisten(&self, word: &Word);

    fn play_cue(&self, cue: Cue);

    fn set_voice(&self, voice: Voice);
}

/// Speaker that only logs
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak_word(&self, word: &Word) {
        tracing::debug!(%word, "speak word");
    }

    fn speak_retry(&self, word: &Word) {
        tracing::debug!(%word, "speak retry");
    }

    fn relisten(&self, word: &Word) {
        tracing::debug!(%word, "relisten");
    }

    fn play_cue(&self, cue: Cue) {
        tracing::debug!(?cue, "play cue");
    }

    fn set_voice(&self, voice: Voice) {
        tracing::debug!(%voice, "voice changed");
    }
}

// ==================== Festival ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Utterance {
    Word,
    Retry,
    Relisten,
}

/// Build the festival script for one utterance
fn festival_script(voice: Voice, stretch: f32, utterance: Utterance, word: &Word) -> String {
    let w = escape(word.as_str());
    let (slow, text) = match (utterance, voice) {
        (Utterance::Word, _) => (false, format!("Please spell... ... {w}")),
        (Utterance::Retry, Voice::American) => (false, format!("Try once more...... {w}...... {w}")),
        (Utterance::Retry, Voice::NewZealand) => (true, format!("Try once more: {w}: {w}")),
        (Utterance::Relisten, _) => (true, w),
    };

    let mut script = String::new();
    script.push_str(voice.festival_command());
    script.push('\n');
    if slow {
        script.push_str(&format!("(Parameter.set 'Duration_Stretch {stretch})\n"));
    }
    script.push_str(&format!("(SayText \"{text}\")\n"));
    script
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

enum Job {
    Say(String),
    Play(PathBuf),
}

/// Speaker driving the `festival` and `mpg123` programs
pub struct FestivalSpeaker {
    config: SpeechConfig,
    voice: Mutex<Voice>,
    sender: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FestivalSpeaker {
    pub fn new(config: SpeechConfig) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let festival = config.festival_bin.clone();
        let player = config.player_bin.clone();

        let worker = thread::Builder::new()
            .name("speech".to_string())
            .spawn(move || {
                for job in receiver {
                    match job {
                        Job::Say(script) => run_festival(&festival, &script),
                        Job::Play(path) => run_player(&player, &path),
                    }
                }
            });
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to start speech worker, audio disabled");
                None
            }
        };

        Self {
            voice: Mutex::new(config.voice),
            config,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(worker),
        }
    }

    pub fn voice(&self) -> Voice {
        *self.voice.lock()
    }

    fn enqueue(&self, job: Job) {
        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            return;
        };
        if sender.send(job).is_err() {
            tracing::debug!("speech worker gone, request dropped");
        }
    }

    fn say(&self, utterance: Utterance, word: &Word) {
        let script = festival_script(self.voice(), self.config.slow_stretch, utterance, word);
        self.enqueue(Job::Say(script));
    }
}

impl Speaker for FestivalSpeaker {
    fn speak_word(&self, word: &Word) {
        self.say(Utterance::Word, word);
    }

    fn speak_retry(&self, word: &Word) {
        self.say(Utterance::Retry, word);
    }

    fn relisten(&self, word: &Word) {
        self.say(Utterance::Relisten, word);
    }

    fn play_cue(&self, cue: Cue) {
        self.enqueue(Job::Play(self.config.sound_dir.join(cue.file_name())));
    }

    fn set_voice(&self, voice: Voice) {
        *self.voice.lock() = voice;
        tracing::info!(%voice, "voice changed");
    }
}

impl Drop for FestivalSpeaker {
    fn drop(&mut self) {
        // closing the channel lets the worker drain and exit
        self.sender.lock().take();
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("speech worker panicked");
            }
        }
    }
}

fn run_festival(bin: &str, script: &str) {
    let child = Command::new(bin)
        .arg("--pipe")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(bin, error = %e, "failed to start festival");
            return;
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(script.as_bytes()) {
            tracing::warn!(error = %e, "failed to send script to festival");
        }
    }
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "festival did not exit cleanly");
    }
}

fn run_player(bin: &str, path: &std::path::Path) {
    match Command::new(bin)
        .arg("-q")
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if !status.success() => {
            tracing::warn!(bin, path = %path.display(), %status, "sound cue failed");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(bin, error = %e, "failed to start sound player"),
    }
}
