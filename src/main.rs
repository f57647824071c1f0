/* Plays the voice on the default output device.
Good starting point for integration of cpal into your application.
*/

#[cfg(feature = "native")]
use std::io::{self, Write};
#[cfg(feature = "native")]
use std::path::PathBuf;

#[cfg(feature = "native")]
use gemini::params::{Control, Mode};
#[cfg(feature = "native")]
use gemini::platform::{AudioOutput, CpalOutput, VoiceEngine};
#[cfg(feature = "native")]
use gemini::utils::init_logger;

#[cfg(feature = "native")]
const HELP: &str = "Commands: 'm <0-3>' mode, 'a' alt layer, '<control id> <value>' move a control, \
's' save patch, 'l' load patch, 'q' quit";

#[cfg(feature = "native")]
fn main() -> anyhow::Result<()> {
    init_logger();

    let patch_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gemini_patch.json"));

    // Create and configure the CPAL output
    let mut cpal_output = CpalOutput::new();
    cpal_output.initialize(48000.0)?;

    let engine = VoiceEngine::new(cpal_output.sample_rate());
    cpal_output.create_stream_with_engine(&engine)?;

    // Start the audio stream
    cpal_output.start()?;

    println!("{}", HELP);

    // Main input loop
    loop {
        let mut input = String::new();
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        match words.as_slice() {
            ["q"] => {
                println!("Quitting...");
                break;
            }
            ["a"] => {
                let alt = engine.with_surface(|surface| {
                    let next = if surface.get(Control::AltLayer) >= 0.5 { 0.0 } else { 1.0 };
                    surface.set(Control::AltLayer, next);
                    next
                });
                println!("Alt layer {}", if alt >= 0.5 { "on" } else { "off" });
            }
            ["m", mode] => match mode.parse::<f32>() {
                Ok(position) => {
                    engine.with_surface(|surface| surface.set(Control::ModeSelect, position));
                    println!("Mode {:?}", Mode::from_position(position));
                }
                Err(_) => println!("{}", HELP),
            },
            ["s"] => {
                let voice = engine.voice();
                let bank = voice.lock().map_err(|_| anyhow::anyhow!("Voice lock poisoned"))?.bank().clone();
                match bank.save_to_file(&patch_path) {
                    Ok(()) => println!("Saved {}", patch_path.display()),
                    Err(e) => println!("Save failed: {:#}", e),
                }
            }
            ["l"] => match std::fs::read_to_string(&patch_path) {
                Ok(json) => match engine.restore_patch(&json) {
                    Ok(report) => println!(
                        "Loaded {} ({} restored, {} rejected)",
                        patch_path.display(),
                        report.restored,
                        report.rejected
                    ),
                    Err(e) => println!("Load failed: {:#}", e),
                },
                Err(e) => println!("Load failed: {}", e),
            },
            [id, value] => match (id.parse::<u8>().ok().and_then(Control::from_id), value.parse::<f32>()) {
                (Some(control), Ok(value)) => {
                    let position = engine.with_surface(|surface| {
                        surface.set(control, value);
                        surface.get(control)
                    });
                    println!("{:?} = {}", control, position);
                }
                _ => println!("{}", HELP),
            },
            _ => {
                println!("{}", HELP);
            }
        }
    }

    cpal_output.stop()?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    println!("This binary is only available with the 'native' feature enabled.");
}
