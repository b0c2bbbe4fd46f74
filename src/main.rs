use clap::Parser;
use molar_analyzer::core::{checked_position, TargetTooth, VolumeSpacing};
use molar_analyzer::utils::{logger, validation::Validate};
use molar_analyzer::{
    Analyzer, AnalyzerConfig, AnalyzerError, CliConfig, Command, FileHost, LocalStorage,
};
use std::path::{Path, PathBuf};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting molar-analyzer");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if run(&cli, &config).is_err() {
        // 錯誤已由宿主顯示
        std::process::exit(2);
    }
}

fn load_config(cli: &CliConfig) -> molar_analyzer::Result<AnalyzerConfig> {
    cli.validate()?;
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AnalyzerConfig::from_file(path)?
        }
        None => AnalyzerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: &CliConfig, config: &AnalyzerConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(".");
    let landmarks_path = cli
        .landmarks
        .clone()
        .or_else(|| config.io.landmarks_path.clone())
        .map(PathBuf::from)
        .ok_or_else(|| AnalyzerError::ConfigError {
            message: "No landmark file given (use --landmarks or io.landmarks_path)".to_string(),
        })
        .map_err(report)?;
    let canal_path = cli
        .canal
        .clone()
        .or_else(|| config.io.canal_path.clone())
        .map(PathBuf::from);

    let spacing = match cli.spacing.as_slice() {
        [sx, sy, sz] => VolumeSpacing::new(*sx, *sy, *sz).map_err(report)?,
        _ => config.volume_spacing()?.unwrap_or_default(),
    };
    if !spacing.is_isotropic() {
        tracing::info!(
            "Anisotropic voxel spacing {:.3} x {:.3} x {:.3}",
            spacing.sx,
            spacing.sy,
            spacing.sz
        );
    }

    let host = FileHost::new(storage.clone(), canal_path, spacing);
    let mut analyzer = Analyzer::with_settings(host, config.analysis_settings());

    let target = match &cli.command {
        Command::War { tooth: Some(code), .. } => Some(code.parse::<TargetTooth>().map_err(report)?),
        _ => config.target()?,
    };
    analyzer.select_target(target);

    if landmarks_path.exists() {
        analyzer.load_landmarks(&storage, &landmarks_path)?;
    } else if matches!(cli.command, Command::Add { .. }) {
        tracing::info!("📄 Starting new landmark file {}", landmarks_path.display());
    } else {
        let e = AnalyzerError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", landmarks_path.display()),
        ));
        return Err(report(e).into());
    }

    match &cli.command {
        Command::List => {
            for landmark in analyzer.store().list() {
                let p = landmark.position;
                println!(
                    "{}\t{}\t{:.3}\t{:.3}\t{:.3}",
                    landmark.id, landmark.label, p.x, p.y, p.z
                );
            }
        }
        Command::Add { label, x, y, z } => {
            let position = checked_position(*x, *y, *z).map_err(report)?;
            let landmark = analyzer.on_user_pick(label, position)?;
            save(&mut analyzer, &storage, &landmarks_path)?;
            println!("✅ Added {} '{}'", landmark.id, landmark.label);
        }
        Command::Move { landmark, x, y, z } => {
            let id = analyzer.resolve(landmark)?;
            let position = checked_position(*x, *y, *z).map_err(report)?;
            analyzer.move_landmark(id, position)?;
            save(&mut analyzer, &storage, &landmarks_path)?;
            println!("✅ Moved {}", id);
        }
        Command::Remove { landmark } => {
            let id = analyzer.resolve(landmark)?;
            let removed = analyzer.remove_landmark(id)?;
            save(&mut analyzer, &storage, &landmarks_path)?;
            println!("✅ Removed {} '{}'", removed.id, removed.label);
        }
        Command::Distance { from, to } => {
            let from = analyzer.resolve(from)?;
            let to = analyzer.resolve(to)?;
            analyzer.measure_between(from, to)?;
        }
        Command::Canal { from: Some(from) } => {
            let from = analyzer.resolve(from)?;
            analyzer.measure_to_canal(from)?;
        }
        Command::Canal { from: None } => {
            analyzer.measure_all_to_canal()?;
        }
        Command::War { bone, nerve, .. } => {
            let bone = analyzer.resolve(bone)?;
            let nerve = analyzer.resolve(nerve)?;
            analyzer.assess_depth(bone, nerve)?;
        }
    }

    Ok(())
}

fn save(
    analyzer: &mut Analyzer<FileHost<LocalStorage>>,
    storage: &LocalStorage,
    path: &Path,
) -> molar_analyzer::Result<()> {
    let count = analyzer.save_landmarks(storage, path)?;
    tracing::debug!("{} landmarks written", count);
    Ok(())
}

/// For failures raised outside the analyzer, which reports its own.
fn report(e: AnalyzerError) -> AnalyzerError {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    e
}
