// Integration tests for the phase accumulator

use gemini::PhaseOscillator;

#[test]
fn test_phase_is_continuous_across_uneven_steps() {
    let mut osc = PhaseOscillator::new(100.0);
    let steps = [1.0e-4, 3.0e-5, 2.5e-4, 7.0e-5, 1.2e-4, 4.0e-5];

    let mut expected = -1.0_f32;
    for &dt in steps.iter().cycle().take(60) {
        let wrapped = osc.advance(dt);
        expected += 100.0 * dt;
        if expected >= 1.0 {
            expected -= 2.0;
            assert!(wrapped);
        }
        assert!((osc.phase() - expected).abs() < 1e-4, "phase {} expected {}", osc.phase(), expected);
        assert!(osc.phase() >= -1.0 && osc.phase() < 1.0);
    }
}

#[test]
fn test_one_wrap_per_period() {
    let sample_rate = 48000.0;
    let mut osc = PhaseOscillator::new(480.0);

    // Phase spans 2 per cycle, so one wrap every 2 / 480 seconds (200 samples)
    let wraps = (0..48000).filter(|_| osc.advance(1.0 / sample_rate)).count();
    assert!((239..=241).contains(&wraps), "got {} wraps", wraps);
}

#[test]
fn test_pitch_change_keeps_phase() {
    let mut osc = PhaseOscillator::new(261.6256);
    for _ in 0..100 {
        osc.advance(1.0 / 48000.0);
    }
    let before = osc.phase();

    osc.update_pitch(2.0);
    assert_eq!(osc.phase(), before);
    assert!((osc.frequency() - 261.6256 * 4.0).abs() < 1e-2);
}

#[test]
fn test_waveforms_stay_in_range() {
    let mut osc = PhaseOscillator::new(1234.5);
    for _ in 0..10000 {
        osc.advance(1.0 / 44100.0);
        for value in [osc.ramp(), osc.triangle(), osc.pulse(0.3, 0.0), osc.sub()] {
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
