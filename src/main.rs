use clap::Parser;
use dayvault::application::ConvertService;
use dayvault::cli::{format_summary, Cli};
use dayvault::error::VaultError;
use dayvault::infrastructure::{logging, ExportFolder, OutputRepository, PartialSettings};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), VaultError> {
    // File layer first, command line on top
    let file = match &cli.config {
        Some(path) => PartialSettings::load(path)?,
        None => PartialSettings::default(),
    };
    let settings = file.layered(cli.settings_layer()).resolve();

    let export = ExportFolder::open(&cli.folder)?;
    let repository = OutputRepository::new(cli.output_dir());
    let service = ConvertService::new(export, repository);

    let report = service.execute(&settings, cli.force)?;
    print!("{}", format_summary(&report));
    Ok(())
}
