use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};
use zendoc::{
  cli::{Cli, Commands},
  commands,
  config::Config,
};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      commands::init(output, format, *force)?;
      info!(
        "Configuration file created successfully. Edit it to customize \
         rendering."
      );
      Ok(())
    },

    Commands::Stylesheet { theme, output } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      let theme = theme.as_deref().unwrap_or(&config.highlight_theme);
      let css = commands::stylesheet(theme)?;
      commands::write_output(output.as_deref(), &css)
    },

    Commands::Render {
      product,
      path,
      format,
      output,
      ..
    } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      config.merge_with_cli(&cli.command);

      let id = commands::document_id(product, path.as_deref());
      let result = commands::render_document(&config, id);
      let rendered = commands::format_result(&result, *format)?;
      commands::write_output(output.as_deref(), &rendered)
    },
  }
}
