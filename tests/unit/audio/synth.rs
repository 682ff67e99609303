use super::*;
use crate::audio::engine::AudioSettings;

fn tone(start_sec: f64, duration_sec: f64, hz: f64, bus: Bus) -> Voice {
    Voice {
        start_sec,
        duration_sec,
        bus,
        waveform: Waveform::Sine,
        freq: vec![(0.0, hz)],
        gain: 0.5,
        envelope: Envelope::sustain(0.0, 0.0),
        filter: Filter::None,
        seed: 0,
    }
}

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(42);
    for _ in 0..64 {
        let v = c.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn envelope_attack_ramps_linearly() {
    let env = Envelope::sustain(0.5, 0.0);
    assert!((env.gain(0.25, 2.0) - 0.5).abs() < 1e-9);
    assert!((env.gain(1.0, 2.0) - 1.0).abs() < 1e-9);
}

#[test]
fn pluck_envelope_decays_exponentially() {
    let env = Envelope::pluck(0.01, 0.1);
    let early = env.gain(0.02, 1.0);
    let late = env.gain(0.5, 1.0);
    assert!(early > late);
    assert!(late < 0.01);
}

#[test]
fn release_fades_the_tail() {
    let env = Envelope::sustain(0.0, 0.5);
    assert!((env.gain(0.0, 2.0) - 1.0).abs() < 1e-9);
    assert!((env.gain(1.75, 2.0) - 0.5).abs() < 1e-9);
    assert!(env.gain(2.0, 2.0).abs() < 1e-9);
}

#[test]
fn frequency_contour_interpolates_piecewise() {
    let v = Voice {
        freq: vec![(0.0, 200.0), (0.5, 800.0), (1.0, 400.0)],
        ..tone(0.0, 0.3, 0.0, Bus::Sfx)
    };
    assert!((v.freq_at(0.0) - 200.0).abs() < 1e-9);
    assert!((v.freq_at(0.25) - 500.0).abs() < 1e-9);
    assert!((v.freq_at(0.5) - 800.0).abs() < 1e-9);
    assert!((v.freq_at(0.75) - 600.0).abs() < 1e-9);
    assert!((v.freq_at(2.0) - 400.0).abs() < 1e-9);

    let constant = tone(0.0, 1.0, 440.0, Bus::Music);
    assert!((constant.freq_at(0.9) - 440.0).abs() < 1e-9);

    let silent = Voice {
        freq: Vec::new(),
        ..tone(0.0, 1.0, 0.0, Bus::Sfx)
    };
    assert!(silent.freq_at(0.5).abs() < 1e-9);
}

#[test]
fn render_produces_interleaved_stereo() {
    let settings = AudioSettings::default();
    let out = render_range(&[], &settings, 0.0, 0.1).unwrap();
    assert_eq!(out.len(), 4410 * usize::from(CHANNELS));
    assert!(out.iter().all(|s| *s == 0.0));
}

#[test]
fn render_rejects_negative_windows() {
    let settings = AudioSettings::default();
    assert!(render_range(&[], &settings, 0.0, -1.0).is_err());
    assert!(render_range(&[], &settings, 0.0, f64::NAN).is_err());
}

#[test]
fn scheduled_tone_is_audible_and_clamped() {
    let settings = AudioSettings::default();
    let loud = Voice {
        gain: 100.0,
        ..tone(0.0, 0.1, 440.0, Bus::Sfx)
    };
    let out = render_range(&[loud], &settings, 0.0, 0.1).unwrap();
    assert!(out.iter().any(|s| s.abs() > 0.5));
    assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    // Both channels carry the center-panned voice.
    let frame = 1000 * usize::from(CHANNELS);
    assert_eq!(out[frame], out[frame + 1]);
}

#[test]
fn bus_gains_apply_at_mix_time() {
    let voices = [tone(0.0, 0.1, 440.0, Bus::Music)];
    let mut settings = AudioSettings::default();
    let audible = render_range(&voices, &settings, 0.0, 0.1).unwrap();
    assert!(audible.iter().any(|s| s.abs() > 0.0));

    settings.music_volume = 0.0;
    let muted = render_range(&voices, &settings, 0.0, 0.1).unwrap();
    assert!(muted.iter().all(|s| *s == 0.0));

    // Other buses are untouched by the music gain.
    let sfx = [tone(0.0, 0.1, 440.0, Bus::Sfx)];
    let still_audible = render_range(&sfx, &settings, 0.0, 0.1).unwrap();
    assert!(still_audible.iter().any(|s| s.abs() > 0.0));
}

#[test]
fn rendering_is_deterministic() {
    let voices = [
        tone(0.0, 0.2, 330.0, Bus::Music),
        Voice {
            waveform: Waveform::Noise,
            seed: 7,
            filter: Filter::Lowpass { cutoff_hz: 800.0 },
            ..tone(0.05, 0.1, 0.0, Bus::Sfx)
        },
    ];
    let settings = AudioSettings::default();
    let a = render_range(&voices, &settings, 0.0, 0.2).unwrap();
    let b = render_range(&voices, &settings, 0.0, 0.2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn voice_onset_lands_on_its_scheduled_frame() {
    let settings = AudioSettings::default();
    // 0.3 s times the sample rate lands just below 13230 in floats;
    // truncating the product would start this voice one frame early.
    let v = tone(0.3, 0.05, 440.0, Bus::Sfx);
    let out = render_range(&[v], &settings, 0.0, 0.4).unwrap();
    let onset = 13_230 * usize::from(CHANNELS);
    assert!(out[..onset].iter().all(|s| *s == 0.0));
    assert!(out[onset..onset + 64].iter().any(|s| s.abs() > 0.0));
}

#[test]
fn adjacent_windows_tile_the_full_mix() {
    let settings = AudioSettings::default();
    let voices = [
        tone(0.3, 0.25, 440.0, Bus::Music),
        Voice {
            waveform: Waveform::Noise,
            seed: 11,
            filter: Filter::Lowpass { cutoff_hz: 1200.0 },
            ..tone(0.05, 0.3, 0.0, Bus::Sfx)
        },
    ];
    let whole = render_range(&voices, &settings, 0.0, 0.6).unwrap();
    let mut tiled = render_range(&voices, &settings, 0.0, 0.3).unwrap();
    tiled.extend(render_range(&voices, &settings, 0.3, 0.3).unwrap());
    // Every frame is written exactly once no matter how the range is cut.
    assert_eq!(whole, tiled);
}

#[test]
fn voices_outside_the_window_are_skipped() {
    let settings = AudioSettings::default();
    let later = tone(10.0, 0.5, 440.0, Bus::Sfx);
    let out = render_range(&[later], &settings, 0.0, 0.5).unwrap();
    assert!(out.iter().all(|s| *s == 0.0));
}

#[test]
fn mix_file_round_trips_bytes() {
    let samples = vec![0.0f32, 0.5, -0.5, 1.0];
    let path = std::env::temp_dir().join(format!("storymotion-mix-{}.f32", std::process::id()));
    write_mix_f32le(&samples, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), samples.len() * 4);
    let back: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(back, samples);
    let _ = std::fs::remove_file(&path);
}
