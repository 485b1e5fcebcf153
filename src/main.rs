use std::{env, process::ExitCode};

use anyhow::Context;
use log::info;

use model_spec::{Layout, Loader, NetworkSource};

fn main() -> ExitCode {
    env_logger::init();

    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: model_spec <spec.json>...");
        return ExitCode::from(2);
    }

    let loader = Loader::default();
    let layout = Layout::from_env();
    info!(
        "network specs in {}, saved models in {}",
        layout.specs_dir().display(),
        layout.saved_models_dir().display()
    );

    let mut failed = 0;
    for path in &paths {
        match check(&loader, &layout, path) {
            Ok(summary) => println!("{path}: {summary}"),
            Err(e) => {
                eprintln!("{path}: {e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} spec(s) failed", paths.len());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn check(loader: &Loader, layout: &Layout, path: &str) -> anyhow::Result<String> {
    let spec = loader
        .load_file(path)
        .with_context(|| format!("cannot load {path}"))?;

    let optimizer = spec
        .optimizer_config()
        .with_context(|| format!("cannot resolve optimizer of {}", spec.name()))?;

    Ok(format!(
        "{} {} latent_dim={} epochs={} batch_size={} beta={} lr={} encoder={} decoder={}",
        spec.name(),
        spec.model_type(),
        spec.latent_dim(),
        spec.epochs(),
        spec.batch_size(),
        spec.vae_beta(),
        optimizer.learning_rate(),
        describe(spec.inference_source(layout)),
        describe(spec.generative_source(layout)),
    ))
}

fn describe(source: NetworkSource<'_>) -> String {
    match source {
        NetworkSource::Registered { name, kwargs } => format!("{name}({} kwargs)", kwargs.len()),
        NetworkSource::SpecFile(path) => path.display().to_string(),
    }
}
