//! 16-bit PCM handling for synthesized speech.
//!
//! The speech model returns raw little-endian 16-bit PCM at 24 kHz, mono,
//! base64 encoded, with no container. This module turns that payload into
//! float samples, wraps it in a WAV file for clients that want a playable
//! file, and decides what a client should do with an arbitrary speech
//! payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// Sample rate of synthesized speech.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Marker returned in place of audio when speech synthesis is unavailable.
pub const BROWSER_TTS_SIGNAL: &str = "BROWSER_TTS_SIGNAL";

/// Spoken instead of the answer when the service is busy.
pub const BUSY_MESSAGE: &str = "Service busy. Using basic voice.";

/// Spoken when a PCM payload cannot be decoded.
pub const BACKUP_MESSAGE: &str = "Reading from backup.";

/// Inputs at most this long are never mistaken for plain text.
const PLAIN_TEXT_MIN_LEN: usize = 50;

/// Errors decoding or encoding audio.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("PCM payload has an odd number of bytes ({0})")]
    OddByteCount(usize),
    #[error("channel count must be at least 1")]
    NoChannels,
    #[error("{samples} samples cannot be split evenly into {channels} channels")]
    MisalignedChannels { samples: usize, channels: usize },
    #[error("channels have different lengths")]
    RaggedChannels,
    #[error("audio is too long for a WAV file")]
    TooLong,
}

/// Decoded audio: one float vector per channel, samples in `[-1.0, 1.0)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Number of frames (samples per channel).
    #[must_use]
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Playback length in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode base64, accepting an optional `data:...;base64,` prefix.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, AudioError> {
    let payload = input
        .split_once(";base64,")
        .map_or(input, |(_, data)| data)
        .trim();
    Ok(STANDARD.decode(payload)?)
}

/// Decode interleaved little-endian 16-bit PCM.
///
/// Frame `i` of channel `c` is `sample[i * channels + c] / 32768.0`.
///
/// # Errors
///
/// Returns an error if the byte count is odd, `channels` is zero, or the
/// sample count is not a multiple of `channels`.
pub fn decode_pcm16(
    bytes: &[u8],
    sample_rate: u32,
    channels: usize,
) -> Result<AudioBuffer, AudioError> {
    if channels == 0 {
        return Err(AudioError::NoChannels);
    }
    if bytes.len() % 2 != 0 {
        return Err(AudioError::OddByteCount(bytes.len()));
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .filter_map(|pair| pair.try_into().ok().map(i16::from_le_bytes))
        .collect();
    if samples.len() % channels != 0 {
        return Err(AudioError::MisalignedChannels {
            samples: samples.len(),
            channels,
        });
    }

    let frames = samples.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in out.iter_mut().zip(frame) {
            channel.push(f32::from(*sample) / 32768.0);
        }
    }

    Ok(AudioBuffer {
        sample_rate,
        channels: out,
    })
}

/// Encode 16-bit samples as base64 little-endian PCM.
#[must_use]
pub fn encode_pcm16_base64(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

/// Wrap base64 PCM in a data URI so [`PlaybackPlan::for_input`] never
/// mistakes it for text.
#[must_use]
pub fn pcm_data_uri(base64_pcm: &str) -> String {
    format!("data:audio/pcm;rate={DEFAULT_SAMPLE_RATE};base64,{base64_pcm}")
}

#[allow(clippy::cast_possible_truncation)]
fn to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Wrap a buffer in a 16-bit PCM RIFF/WAVE file.
///
/// # Errors
///
/// Returns an error if the buffer has no channels, channels of different
/// lengths, or more data than a WAV header can describe.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    let frames = buffer.frames();
    if buffer.channels.is_empty() {
        return Err(AudioError::NoChannels);
    }
    if buffer.channels.iter().any(|c| c.len() != frames) {
        return Err(AudioError::RaggedChannels);
    }

    let channels = u16::try_from(buffer.channels.len()).map_err(|_| AudioError::TooLong)?;
    let block_align = channels.checked_mul(2).ok_or(AudioError::TooLong)?;
    let byte_rate = buffer
        .sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or(AudioError::TooLong)?;
    let data_len = frames
        .checked_mul(usize::from(block_align))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(AudioError::TooLong)?;
    let riff_len = data_len.checked_add(36).ok_or(AudioError::TooLong)?;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());

    for i in 0..frames {
        for channel in &buffer.channels {
            let sample = channel.get(i).copied().unwrap_or_default();
            out.extend_from_slice(&to_i16(sample).to_le_bytes());
        }
    }
    Ok(out)
}

/// What a client should do with a speech payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackPlan {
    /// Nothing to play.
    Nothing,
    /// Read this text with the device's own speech synthesizer.
    Speak(String),
    /// Play decoded audio.
    Pcm(AudioBuffer),
}

impl PlaybackPlan {
    /// Classify a payload returned by the speech endpoint.
    ///
    /// The busy signal and anything that looks like plain prose (longer than
    /// 50 characters, not a path, no `;base64,` marker) are spoken directly,
    /// so long PCM payloads must arrive as data URIs (see [`pcm_data_uri`]).
    /// Everything else is decoded as 24 kHz mono PCM; if that fails the
    /// backup message is spoken.
    #[must_use]
    pub fn for_input(input: &str) -> Self {
        if input.is_empty() {
            return Self::Nothing;
        }
        if input == BROWSER_TTS_SIGNAL {
            return Self::Speak(BUSY_MESSAGE.to_owned());
        }
        if !input.starts_with('/')
            && input.chars().count() > PLAIN_TEXT_MIN_LEN
            && !input.contains(";base64,")
        {
            return Self::Speak(input.to_owned());
        }

        match decode_base64(input).and_then(|bytes| decode_pcm16(&bytes, DEFAULT_SAMPLE_RATE, 1)) {
            Ok(buffer) => Self::Pcm(buffer),
            Err(_) => Self::Speak(BACKUP_MESSAGE.to_owned()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_round_trip() {
        let samples = [0i16, 1, -1, 16_384, -16_384, i16::MAX, i16::MIN];
        let encoded = encode_pcm16_base64(&samples);
        let bytes = decode_base64(&encoded).unwrap();
        let buffer = decode_pcm16(&bytes, DEFAULT_SAMPLE_RATE, 1).unwrap();

        assert_eq!(buffer.frames(), samples.len());
        for (decoded, original) in buffer.channels[0].iter().zip(samples) {
            let expected = f32::from(original) / 32768.0;
            assert!((decoded - expected).abs() < 1e-6);
        }
        assert!((buffer.channels[0][3] - 0.5).abs() < 1e-6);
        assert!((buffer.channels[0][6] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_deinterleaves_stereo() {
        let bytes = decode_base64(&encode_pcm16_base64(&[100, -100, 200, -200])).unwrap();
        let buffer = decode_pcm16(&bytes, 48_000, 2).unwrap();
        assert_eq!(buffer.frames(), 2);
        assert!(buffer.channels[0].iter().all(|s| *s > 0.0));
        assert!(buffer.channels[1].iter().all(|s| *s < 0.0));
    }

    #[test]
    fn test_rejects_malformed_pcm() {
        assert!(matches!(
            decode_pcm16(&[1, 2, 3], DEFAULT_SAMPLE_RATE, 1),
            Err(AudioError::OddByteCount(3))
        ));
        assert!(matches!(
            decode_pcm16(&[0; 6], DEFAULT_SAMPLE_RATE, 2),
            Err(AudioError::MisalignedChannels { samples: 3, channels: 2 })
        ));
        assert!(matches!(
            decode_pcm16(&[0; 4], DEFAULT_SAMPLE_RATE, 0),
            Err(AudioError::NoChannels)
        ));
    }

    #[test]
    fn test_decode_base64_strips_data_uri() {
        let bytes = decode_base64("data:audio/pcm;base64,AQID").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_encode_wav_header() {
        let buffer = AudioBuffer {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: vec![vec![0.0, 0.5, -0.5]],
        };
        let wav = encode_wav(&buffer).unwrap();
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 24_000);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), 16_384);
    }

    #[test]
    fn test_playback_plan() {
        assert_eq!(PlaybackPlan::for_input(""), PlaybackPlan::Nothing);
        assert_eq!(
            PlaybackPlan::for_input(BROWSER_TTS_SIGNAL),
            PlaybackPlan::Speak(BUSY_MESSAGE.to_owned())
        );

        let prose = "Apply two tonnes of well rotted farmyard manure per acre before sowing.";
        assert_eq!(
            PlaybackPlan::for_input(prose),
            PlaybackPlan::Speak(prose.to_owned())
        );

        let pcm = pcm_data_uri(&encode_pcm16_base64(&[0; 64]));
        match PlaybackPlan::for_input(&pcm) {
            PlaybackPlan::Pcm(buffer) => assert_eq!(buffer.frames(), 64),
            other => panic!("expected PCM, got {other:?}"),
        }

        assert_eq!(
            PlaybackPlan::for_input("AQID"),
            PlaybackPlan::Speak(BACKUP_MESSAGE.to_owned())
        );
    }
}
