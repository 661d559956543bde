use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use qistyle::config::QrOptions;
use qistyle::helper::{render_image, write_image, ExportFormat};
use qistyle::RenderError;

/// Render a styled QR code from a JSON options file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file with the render options (value, size, qrStyle, eyeColor, logoImage, ...)
    options: PathBuf,

    /// Output image; the extension selects PNG, JPEG or WEBP
    output: PathBuf,
}

fn run(args: &Args) -> qistyle::Result<()> {
    let format = ExportFormat::from_path(&args.output).ok_or_else(|| {
        RenderError::InvalidConfig(format!("unsupported output {}", args.output.display()))
    })?;

    let options = QrOptions::from_json(&std::fs::read_to_string(&args.options)?)?;
    info!("rendering {:?} as {:?}", options.value, options.qr_style);

    let image = render_image(&options)?;
    write_image(&image, &args.output, format)?;
    info!("wrote {} ({}x{})", args.output.display(), image.width(), image.height());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_require_output() {
        let err = Args::try_parse_from(["qistyle", "opts.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["qistyle", "opts.json", "qr.webp"]).unwrap();
        assert_eq!(args.options, PathBuf::from("opts.json"));
        assert_eq!(args.output, PathBuf::from("qr.webp"));
    }
}
