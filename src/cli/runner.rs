use tracing::info;
use tracing_subscriber::EnvFilter;

use stereoscale::api::{StereoPairPaths, inspect_stereo_pair, process_stereo_pair};
use stereoscale::core::params::RescaleParams;

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Preset values override the defaults; explicit flags override both.
pub fn resolve_params(args: &CliArgs) -> Result<RescaleParams, AppError> {
    let mut params = match &args.config {
        Some(path) => {
            RescaleParams::from_json_file(path).map_err(|source| AppError::InvalidPreset {
                path: path.clone(),
                source,
            })?
        }
        None => RescaleParams::default(),
    };

    if let Some(scale) = args.scale {
        params.target_scale = scale;
    }
    if let Some(divisor) = args.divisor {
        params.divisor = divisor;
    }
    if let Some(filter) = args.filter {
        params.filter = filter;
    }
    Ok(params)
}

pub fn build_paths(args: &CliArgs) -> StereoPairPaths {
    let mut paths = StereoPairPaths::new(&args.left, &args.right, &args.k_matrix);
    if let Some(p) = &args.output_left {
        paths.output_left = p.clone();
    }
    if let Some(p) = &args.output_right {
        paths.output_right = p.clone();
    }
    if let Some(p) = &args.output_k {
        paths.output_k = p.clone();
    }
    paths.report = args.report.clone();
    paths
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    if args.log {
        init_logging();
    }

    let params = resolve_params(&args)?;
    let paths = build_paths(&args);
    params.scale_request().validate()?;

    if args.dry_run {
        let plan = inspect_stereo_pair(&paths, &params)?;
        println!(
            "{} -> {} (divisor {}, scale w={:.6} h={:.6})",
            plan.plan.original,
            plan.plan.output,
            plan.plan.divisor,
            plan.plan.actual_scale_w,
            plan.plan.actual_scale_h
        );
        println!("K:\n{}", plan.rescaled.k);
        if let Some(b) = plan.rescaled.baseline {
            println!("baseline: {:?}", b);
        }
        return Ok(());
    }

    let outcome = process_stereo_pair(&paths, &params)?;
    info!(
        "Successfully processed {:?} + {:?} -> {} ({} files)",
        paths.left,
        paths.right,
        outcome.plan.output,
        outcome.written.len()
    );
    Ok(())
}
