//! chipvoice CLI — demo playback and WAV export.
//!
//! Usage:
//!   cv-cli                   play the demo arpeggio
//!   cv-cli --wav out.wav     render the demo to a WAV file

use cv_master::Controller;
use std::io::Write;
use std::{env, fs};

const SAMPLE_RATE: u32 = 44_100;

fn main() {
    let args: Vec<String> = env::args().collect();
    let wav_path = args
        .iter()
        .position(|a| a == "--wav")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let mut ctrl = Controller::new(SAMPLE_RATE);
    ctrl.load_demo();

    println!("Events:   {}", ctrl.events().len());
    println!(
        "Length:   {:.2} s at {} Hz",
        ctrl.duration_frames() as f64 / SAMPLE_RATE as f64,
        SAMPLE_RATE
    );
    println!();

    match wav_path {
        Some(path) => render_to_wav(&ctrl, &path),
        None => play_audio(&mut ctrl),
    }
}

fn play_audio(ctrl: &mut Controller) {
    ctrl.play();
    println!("Playing...");

    while ctrl.is_playing() {
        if let Some(pos) = ctrl.position() {
            print!("\rFrame: {:>8}", pos);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    println!("\rDone.          ");
}

fn render_to_wav(ctrl: &Controller, path: &str) {
    println!("Rendering to {}...", path);

    let wav = ctrl.render_to_wav(512);
    println!("Rendered {} bytes", wav.len());

    fs::write(path, &wav).unwrap_or_else(|e| {
        eprintln!("Failed to write {}: {}", path, e);
        std::process::exit(1);
    });

    println!("Done.");
}
