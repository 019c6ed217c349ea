use std::{
    env,
    io::{self, BufRead, Write},
};

use datagen::{GeneratorConfig, generate_training_data, probe_points};
use log::{debug, info};
use machine_learning::{
    config::TrainingConfig,
    inference::{mean_output, predict},
    training::{Outcome, TrainerBuilder},
};

/// Progress is logged every this many epochs.
const PROGRESS_EVERY: usize = 500;

fn main() -> io::Result<()> {
    env_logger::init();

    let training = match env::var("TRAINING_CONFIG") {
        Ok(path) => TrainingConfig::load(path)?,
        Err(_) => TrainingConfig::default(),
    };

    let generator = match env::var("GENERATOR_CONFIG") {
        Ok(path) => GeneratorConfig::load(path)?,
        Err(_) => GeneratorConfig::default(),
    };

    let (a, b) = read_amplitudes(&mut io::stdin().lock(), &mut io::stdout())?;
    info!("amplitudes read: A={a} B={b}");

    let dataset = generate_training_data(&generator)?;
    let mut trainer = TrainerBuilder::new().build(&training)?;
    info!("training on {} samples", dataset.len());

    let samples = dataset.len() as f32;
    let summary = trainer.train(&dataset, training.epochs, |report| {
        if report.outcome == Outcome::Diverged || report.epoch % PROGRESS_EVERY == 0 {
            info!(
                "epoch {}: avg loss={:.6} lr={:.6} ({:?})",
                report.epoch,
                report.loss / samples,
                report.learning_rate,
                report.outcome
            );
        }
    })?;

    info!(
        "trained {} epochs, {} rollbacks, {} decays",
        summary.epochs, summary.rollbacks, summary.decays
    );

    let probes = probe_points(a, b, &generator)?;
    let network = trainer.run().network();
    debug!("mean raw output: {}", mean_output(network, probes.view())?);

    let predicted = predict(network, probes.view(), &generator.horizon_scale())?;
    println!("Predicted horizon from the probe points: {predicted:.4}");

    Ok(())
}

/// Prompts for two amplitudes and parses them from a single line.
fn read_amplitudes<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<(f32, f32)> {
    write!(output, "Enter amplitudes (A and B): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let values = line
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    match values[..] {
        [a, b] => Ok((a, b)),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("expected two amplitudes, got {}", values.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_amplitudes() {
        let mut output = Vec::new();
        let amplitudes = read_amplitudes(&mut "3 -2.5\n".as_bytes(), &mut output).unwrap();

        assert_eq!(amplitudes, (3., -2.5));
        assert_eq!(output, b"Enter amplitudes (A and B): ");
    }

    #[test]
    fn rejects_malformed_input() {
        let mut output = Vec::new();

        let err = read_amplitudes(&mut "3\n".as_bytes(), &mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = read_amplitudes(&mut "three four\n".as_bytes(), &mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
