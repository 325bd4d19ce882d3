use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

use crate::settings::SpeechSettings;

enum SpeechCommand {
    Speak(String),
}

/// Handle to the speech engine thread. Utterances are fire-and-forget: they
/// queue on the sink in arrival order, with no completion tracking and no
/// cancellation of speech already playing.
pub struct SpeechHandle {
    tx: Arc<Mutex<Option<Sender<SpeechCommand>>>>,
    voice: SpeechSettings,
}

impl SpeechHandle {
    pub fn new(voice: SpeechSettings) -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            voice,
        }
    }

    fn ensure_thread(&self) -> Result<Sender<SpeechCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<SpeechCommand>();
        let voice = self.voice.clone();

        // Dedicated thread holding the non-Send audio output objects.
        thread::Builder::new()
            .name("speech-engine".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(SpeechCommand::Speak(text)) = rx.recv() {
                    log::info!("narrating caption: {}", text);
                    let samples = match synthesize(&voice, &text) {
                        Ok(samples) => samples,
                        Err(err) => {
                            log::error!("speech synthesis failed: {}", err);
                            continue;
                        }
                    };

                    if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                        log::error!("{}", err);
                        continue;
                    }
                    if let Some(ref s) = sink {
                        s.append(SamplesBuffer::new(1, voice.sample_rate, samples));
                        s.play();
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }

    pub fn speak(&self, text: &str) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(SpeechCommand::Speak(text.to_string()))
            .map_err(|e| e.to_string())
    }
}

/// Run the Piper TTS subprocess and collect its raw 16-bit mono PCM output.
fn synthesize(voice: &SpeechSettings, text: &str) -> Result<Vec<i16>, String> {
    if !std::path::Path::new(&voice.voice_model).exists() {
        return Err(format!("voice model not found: {}", voice.voice_model));
    }

    let mut piper = Command::new(&voice.piper_bin)
        .args(["--model", &voice.voice_model, "--output_raw"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to start {}: {}", voice.piper_bin, e))?;

    if let Some(mut stdin) = piper.stdin.take() {
        let _ = stdin.write_all(text.as_bytes());
        // Closing stdin tells piper the utterance is complete.
    }

    let output = piper
        .wait_with_output()
        .map_err(|e| format!("piper did not finish: {}", e))?;
    if !output.status.success() {
        return Err(format!("piper exited with {}", output.status));
    }

    let samples = output
        .stdout
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(samples)
}
