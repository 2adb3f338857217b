//! Batch runner against a scratch directory

use centroid_bandpass::batch::{
    load_wav, save_wav, AudioBuffer, BatchError, BatchRunner, ItemOutcome, JobDescription,
};
use centroid_bandpass::engine::CentroidError;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "centroid-bandpass-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_tone(path: &Path, freqs: &[f64], sample_rate: u32, len: usize) {
    let samples: Vec<f64> = (0..len)
        .map(|n| {
            freqs
                .iter()
                .map(|f| 0.4 * (2.0 * PI * f * n as f64 / sample_rate as f64).sin())
                .sum()
        })
        .collect();
    save_wav(path, &samples, sample_rate).unwrap();
}

fn job(root: &Path, bandwidths: Vec<f64>) -> JobDescription {
    JobDescription::from_yaml_str(&format!(
        "input_folder: {}\noutput_folder: {}\nsample_rate: 22050\nbandwidths: {:?}\n",
        root.join("in").display(),
        root.join("out").display(),
        bandwidths
    ))
    .unwrap()
}

#[test]
fn batch_writes_reference_and_filtered_files() {
    let root = scratch_dir("batch-ok");
    let input = root.join("in");
    std::fs::create_dir_all(&input).unwrap();

    write_tone(&input.join("a_tone.wav"), &[1000.0], 22050, 11025);
    write_tone(&input.join("c_chord.wav"), &[500.0, 3000.0], 44100, 22050);
    std::fs::write(input.join("notes.txt"), "not audio").unwrap();

    let runner = BatchRunner::new(job(&root, vec![800.0, 2000.0])).unwrap();
    let files = runner.input_files().unwrap();
    assert_eq!(files, vec![input.join("a_tone.wav"), input.join("c_chord.wav")]);

    let report = runner.run().unwrap();
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.items.len(), 6);

    let out = root.join("out");
    for name in [
        "a_tone_full.wav",
        "a_tone_800.wav",
        "a_tone_2000.wav",
        "c_chord_full.wav",
        "c_chord_800.wav",
        "c_chord_2000.wav",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }

    // Every output is at the job rate; the 44.1 kHz input was resampled
    let chord = load_wav(out.join("c_chord_800.wav")).unwrap();
    assert_eq!(chord.sample_rate, 22050);
    assert_eq!(chord.len(), 11025);

    let reference = AudioBuffer::load(out.join("c_chord_full.wav")).unwrap();
    assert_eq!(reference.sample_rate, 22050);
    assert!((reference.duration() - 0.5).abs() < 1e-9);
}

#[test]
fn batch_continues_past_failures() {
    let root = scratch_dir("batch-fail");
    let input = root.join("in");
    std::fs::create_dir_all(&input).unwrap();

    write_tone(&input.join("a_tone.wav"), &[1000.0], 22050, 11025);
    save_wav(input.join("b_silent.wav"), &vec![0.0; 11025], 22050).unwrap();
    std::fs::write(input.join("c_broken.wav"), b"RIFF????").unwrap();
    write_tone(&input.join("d_tone.wav"), &[2000.0], 22050, 11025);

    let runner = BatchRunner::new(job(&root, vec![500.0])).unwrap();
    let report = runner.run().unwrap();

    assert!(!report.is_success());
    // Silent file: its reference copy is written, its band fails;
    // broken file: fails as a whole
    assert_eq!(report.failure_count(), 2);

    let silent_failure = report
        .failures()
        .find(|item| item.input.ends_with("b_silent.wav"))
        .unwrap();
    assert!(matches!(
        silent_failure.outcome,
        ItemOutcome::Failed {
            bandwidth_hz: Some(_),
            error: BatchError::Engine(CentroidError::DegenerateSignal { .. }),
        }
    ));

    let broken_failure = report
        .failures()
        .find(|item| item.input.ends_with("c_broken.wav"))
        .unwrap();
    assert!(matches!(
        broken_failure.outcome,
        ItemOutcome::Failed {
            bandwidth_hz: None,
            ..
        }
    ));

    let out = root.join("out");
    assert!(out.join("b_silent_full.wav").is_file());
    assert!(!out.join("b_silent_500.wav").exists());
    assert!(out.join("a_tone_500.wav").is_file());
    assert!(out.join("d_tone_500.wav").is_file());
}

#[test]
fn missing_input_folder_is_an_error() {
    let root = scratch_dir("batch-missing");
    let runner = BatchRunner::new(job(&root, vec![500.0])).unwrap();
    assert!(matches!(runner.run(), Err(BatchError::Io { .. })));
}

#[test]
fn repeated_bandwidth_is_rejected_before_any_output() {
    let root = scratch_dir("batch-repeat");
    let input = root.join("in");
    std::fs::create_dir_all(&input).unwrap();
    write_tone(&input.join("a_tone.wav"), &[1000.0], 22050, 4096);

    let yaml = format!(
        "input_folder: {}\noutput_folder: {}\nsample_rate: 22050\nbandwidths: [500, 500]\n",
        input.display(),
        root.join("out").display()
    );
    assert!(matches!(
        JobDescription::from_yaml_str(&yaml),
        Err(BatchError::InvalidJob(_))
    ));
    assert!(!root.join("out").exists());
}
