use std::io;
use std::path::PathBuf;

use calidad_aguas::{run_scrap, ScraperConfig};
use structopt::{clap::AppSettings, clap::Shell, StructOpt};

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(setting(AppSettings::Hidden))]
    Completion,
}

/// Bathing water quality scraper
#[derive(Debug, StructOpt)]
#[structopt(name = "calidad-aguas")]
pub struct Opts {
    #[structopt(subcommand)]
    pub command: Option<Command>,
    /// Optional yaml configuration file
    #[structopt(long, env = "CALIDAD_AGUAS_CONFIG", parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Override the csv whose header gives the output columns
    #[structopt(long, parse(from_os_str))]
    pub template: Option<PathBuf>,
    /// Override the path of the written csv
    #[structopt(long, parse(from_os_str))]
    pub output: Option<PathBuf>,
    /// Also write every measurement of every beach to this csv
    #[structopt(long, parse(from_os_str))]
    pub history: Option<PathBuf>,
    /// Override the Náyade zone page url
    #[structopt(long)]
    pub base_url: Option<String>,
    /// When quiet no logs are outputted
    #[structopt(long, short)]
    pub quiet: bool,
}

impl TryFrom<&Opts> for ScraperConfig {
    type Error = anyhow::Error;

    fn try_from(opts: &Opts) -> Result<Self, Self::Error> {
        let mut conf = match &opts.config {
            Some(path) => ScraperConfig::from_yaml(path)?,
            None => ScraperConfig::default(),
        };
        if let Some(template) = &opts.template {
            conf.template = template.clone();
        }
        if let Some(output) = &opts.output {
            conf.output = output.clone();
        }
        if let Some(history) = &opts.history {
            conf.history = Some(history.clone());
        }
        if let Some(base_url) = &opts.base_url {
            conf.base_url = base_url.to_string();
        }
        Ok(conf)
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();

    match opts.command {
        Some(Command::Completion) => {
            Opts::clap().gen_completions_to("calidad-aguas", Shell::Bash, &mut io::stdout());
            Ok(())
        }
        None => {
            if !opts.quiet {
                env_logger::Builder::from_env(
                    env_logger::Env::default().default_filter_or("calidad_aguas=info"),
                )
                .init();
            }
            let conf = ScraperConfig::try_from(&opts)?;
            run_scrap(&conf)
        }
    }
}
