//! Offline renderer — mixes tone requests into a mono f32 buffer.
//!
//! Used for AudioWorklet playback from WASM and for checking what a
//! chord or click actually sounds like in tests.

use super::ToneRequest;
use super::oscillator::Oscillator;

/// Render `tones` to mono samples starting at audio time 0.
///
/// The buffer ends at the latest stop time. Each tone is silent outside
/// its `[start, stop)` window.
pub fn render_tones(tones: &[ToneRequest], sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate as f64;
    let end = tones.iter().map(|t| t.stop).fold(0.0_f64, f64::max);
    let total_samples = (end * sr).ceil() as usize;
    let mut out = vec![0.0f64; total_samples];

    for tone in tones {
        let first = (tone.start.max(0.0) * sr).round() as usize;
        let last = ((tone.stop * sr).round() as usize).min(total_samples);
        if first >= last {
            continue;
        }
        let mut osc = Oscillator::new(tone.frequency, sr);
        for sample in &mut out[first..last] {
            *sample += osc.next_sample() * tone.gain;
        }
    }

    out.iter().map(|&s| s as f32).collect()
}
